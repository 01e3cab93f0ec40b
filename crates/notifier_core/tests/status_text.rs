use notifier_core::{
    compose_display_text, finalize_display_text, no_response_line, StatusPlan, StatusStrings,
    MAX_DISPLAY_CHARS, MAX_PROXY_INFO_CHARS,
};
use pretty_assertions::assert_eq;

#[test]
fn idle_plan_uses_description() {
    let strings = StatusStrings::default();
    let line = StatusPlan::for_count(0).fixed_line(&strings);
    assert_eq!(line, Some(strings.idle_description.clone()));
}

#[test]
fn summary_plan_counts_servers() {
    let strings = StatusStrings::default();
    let line = StatusPlan::for_count(3).fixed_line(&strings);
    assert_eq!(line.as_deref(), Some("3 servers running"));
    assert_eq!(StatusPlan::for_count(2).fixed_line(&strings), None);
}

#[test]
fn summary_template_is_localizable() {
    let strings = StatusStrings {
        servers_running: "Serveurs actifs : {count}".to_string(),
        ..StatusStrings::default()
    };
    let line = StatusPlan::for_count(7).fixed_line(&strings);
    assert_eq!(line.as_deref(), Some("Serveurs actifs : 7"));
}

#[test]
fn worker_lines_joined_in_order() {
    let strings = StatusStrings::default();
    let text = compose_display_text(
        vec!["alpha: 1080".to_string(), "beta: 1081".to_string()],
        None,
        &strings,
    );
    assert_eq!(text, "alpha: 1080\nbeta: 1081");
}

#[test]
fn proxy_line_is_truncated_to_fifty_chars() {
    let strings = StatusStrings::default();
    let info = "http://10.0.0.1:8080/very/long/path/that/keeps/going/exceeding/fifty/chars";
    assert!(info.chars().count() > MAX_PROXY_INFO_CHARS);

    let text = compose_display_text(vec!["a".to_string()], Some(info), &strings);
    let expected = format!("a\nCurrent system proxy: {}", &info[..MAX_PROXY_INFO_CHARS]);
    assert_eq!(text, expected);
}

#[test]
fn empty_proxy_info_adds_no_line() {
    let strings = StatusStrings::default();
    let text = compose_display_text(vec!["a".to_string()], Some(""), &strings);
    assert_eq!(text, "a");
}

#[test]
fn final_text_never_exceeds_cap() {
    let strings = StatusStrings::default();
    let long = "x".repeat(300);
    for lines in [
        vec![long.clone()],
        vec![long.clone(), long.clone()],
        vec!["short".to_string()],
        Vec::new(),
    ] {
        for proxy in [None, Some(long.as_str()), Some("127.0.0.1:1080")] {
            let text = compose_display_text(lines.clone(), proxy, &strings);
            assert!(text.chars().count() <= MAX_DISPLAY_CHARS, "{text}");
            assert!(!text.is_empty());
        }
    }
}

#[test]
fn empty_text_falls_back_to_idle_description() {
    let strings = StatusStrings::default();
    assert_eq!(finalize_display_text("", &strings), strings.idle_description);
    assert_eq!(
        compose_display_text(Vec::new(), None, &strings),
        strings.idle_description
    );
}

#[test]
fn no_response_line_names_worker() {
    let strings = StatusStrings::default();
    assert_eq!(no_response_line(7, &strings), "7 (no response)");
}
