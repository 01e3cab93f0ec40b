use std::fmt::Display;

/// Hard cap on the tooltip text handed to the display sink.
pub const MAX_DISPLAY_CHARS: usize = 127;
/// Cap on the system proxy address/URL quoted in the summary line.
pub const MAX_PROXY_INFO_CHARS: usize = 50;
/// Above this many running workers only a count is shown.
pub const DETAILED_WORKER_LIMIT: usize = 2;

/// Localized fragments used to assemble the tooltip.
///
/// `servers_running` and `no_response` are templates: `{count}` and `{id}` are
/// substituted respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusStrings {
    pub idle_description: String,
    pub servers_running: String,
    pub current_system_proxy: String,
    pub no_response: String,
}

impl Default for StatusStrings {
    fn default() -> Self {
        Self {
            idle_description: "Proxy notifier: no server is running".to_string(),
            servers_running: "{count} servers running".to_string(),
            current_system_proxy: "Current system proxy: ".to_string(),
            no_response: "{id} (no response)".to_string(),
        }
    }
}

/// How a pass describes its running workers, decided from the count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPlan {
    Idle,
    /// Ask every worker for its own notification text.
    Detailed { count: usize },
    /// Too many workers to list; show only the count.
    Summary { count: usize },
}

impl StatusPlan {
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => StatusPlan::Idle,
            n if n <= DETAILED_WORKER_LIMIT => StatusPlan::Detailed { count: n },
            n => StatusPlan::Summary { count: n },
        }
    }

    /// The single line used instead of per-worker texts, if this plan needs no fetch.
    pub fn fixed_line(&self, strings: &StatusStrings) -> Option<String> {
        match self {
            StatusPlan::Idle => Some(strings.idle_description.clone()),
            StatusPlan::Summary { count } => Some(
                strings
                    .servers_running
                    .replace("{count}", &count.to_string()),
            ),
            StatusPlan::Detailed { .. } => None,
        }
    }
}

/// Returns at most `max` characters of `text`, cut on a char boundary.
pub fn cut_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Line substituted for a worker whose text did not arrive in time.
pub fn no_response_line(worker: impl Display, strings: &StatusStrings) -> String {
    strings.no_response.replace("{id}", &worker.to_string())
}

/// Joins the worker summary lines, appends the system proxy line and applies the cap.
pub fn compose_display_text(
    mut lines: Vec<String>,
    sys_proxy_info: Option<&str>,
    strings: &StatusStrings,
) -> String {
    if let Some(info) = sys_proxy_info.filter(|info| !info.is_empty()) {
        lines.push(format!(
            "{}{}",
            strings.current_system_proxy,
            cut_chars(info, MAX_PROXY_INFO_CHARS)
        ));
    }
    finalize_display_text(&lines.join("\n"), strings)
}

/// Applies the display cap; empty text falls back to the idle description.
pub fn finalize_display_text(raw: &str, strings: &StatusStrings) -> String {
    let text = cut_chars(raw, MAX_DISPLAY_CHARS);
    if text.is_empty() {
        cut_chars(&strings.idle_description, MAX_DISPLAY_CHARS).to_string()
    } else {
        text.to_string()
    }
}
