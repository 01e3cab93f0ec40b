use std::sync::Once;

use notifier_core::{update, AppState, Effect, IconState, Msg, PassId, ProxyMode, StatusReport};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(notifier_logging::initialize_for_tests);
}

fn report(pass: PassId, text: &str, mode: ProxyMode, running: bool) -> Msg {
    Msg::StatusReported(StatusReport {
        pass,
        text: text.to_string(),
        icon: IconState { mode, running },
    })
}

#[test]
fn first_report_sets_tooltip_and_icon() {
    init_logging();
    let (mut state, effects) = update(
        AppState::with_tooltip("idle"),
        report(1, "server a", ProxyMode::Proxy, true),
    );

    assert_eq!(
        effects,
        vec![
            Effect::SetTooltip {
                text: "server a".to_string()
            },
            Effect::SetIcon {
                state: IconState {
                    mode: ProxyMode::Proxy,
                    running: true
                }
            },
        ]
    );
    let view = state.view();
    assert_eq!(view.tooltip, "server a");
    assert_eq!(view.last_pass, Some(1));
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn unchanged_text_and_icon_emit_nothing() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        report(1, "server a", ProxyMode::Direct, true),
    );
    let (mut state, effects) = update(state, report(2, "server a", ProxyMode::Direct, true));

    assert!(effects.is_empty());
    assert_eq!(state.view().last_pass, Some(2));
    state.consume_dirty();
    let (mut state, _) = update(state, report(3, "server a", ProxyMode::Direct, true));
    assert!(!state.consume_dirty());
}

#[test]
fn icon_redraws_only_when_running_state_or_mode_changes() {
    init_logging();
    let (state, _) = update(AppState::new(), report(1, "a", ProxyMode::Direct, true));
    let (state, effects) = update(state, report(2, "b", ProxyMode::Direct, true));
    assert_eq!(
        effects,
        vec![Effect::SetTooltip {
            text: "b".to_string()
        }]
    );

    let (_state, effects) = update(state, report(3, "b", ProxyMode::Pac, true));
    assert_eq!(
        effects,
        vec![Effect::SetIcon {
            state: IconState {
                mode: ProxyMode::Pac,
                running: true
            }
        }]
    );
}

#[test]
fn older_pass_completing_late_is_discarded() {
    init_logging();
    let (state, _) = update(AppState::new(), report(2, "newer", ProxyMode::Direct, true));
    let (state, effects) = update(state, report(1, "older", ProxyMode::Proxy, false));

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.tooltip, "newer");
    assert_eq!(
        view.icon,
        Some(IconState {
            mode: ProxyMode::Direct,
            running: true
        })
    );
    assert_eq!(view.last_pass, Some(2));
    assert_eq!(view.stale_reports, 1);
}

#[test]
fn stale_report_leaves_nothing_to_redraw() {
    init_logging();
    let (mut state, _) = update(AppState::new(), report(3, "current", ProxyMode::Proxy, true));
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, report(2, "older", ProxyMode::Direct, false));
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());

    let (mut state, effects) = update(state, Msg::ShutdownRequested);
    assert_eq!(effects, vec![Effect::HideIcon]);
    assert!(state.consume_dirty());
}

#[test]
fn repeated_pass_id_is_treated_as_stale() {
    init_logging();
    let (state, _) = update(AppState::new(), report(4, "first", ProxyMode::Direct, true));
    let (state, effects) = update(state, report(4, "second", ProxyMode::Direct, true));

    assert!(effects.is_empty());
    assert_eq!(state.view().tooltip, "first");
}

#[test]
fn shutdown_hides_icon_once_and_ignores_late_reports() {
    init_logging();
    let (state, _) = update(AppState::new(), report(1, "a", ProxyMode::Direct, true));
    let (state, effects) = update(state, Msg::ShutdownRequested);
    assert_eq!(effects, vec![Effect::HideIcon]);

    let (state, effects) = update(state, Msg::ShutdownRequested);
    assert!(effects.is_empty());

    let (state, effects) = update(state, report(2, "late", ProxyMode::Proxy, false));
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.shut_down);
    assert_eq!(view.tooltip, "a");
    assert_eq!(view.last_pass, Some(1));
}
