use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StatusReported(report) => {
            // Nothing reaches the sink once the icon has been hidden.
            if state.is_shut_down() {
                return (state, Vec::new());
            }
            // Last writer wins by pass sequence, not by arrival order.
            if !state.is_newer_pass(report.pass) {
                state.note_stale_report();
                return (state, Vec::new());
            }
            state.accept_pass(report.pass);

            let mut effects = Vec::with_capacity(2);
            if state.set_tooltip(&report.text) {
                effects.push(Effect::SetTooltip { text: report.text });
            }
            if state.set_icon(report.icon) {
                effects.push(Effect::SetIcon { state: report.icon });
            }
            effects
        }
        Msg::ShutdownRequested => {
            if state.is_shut_down() {
                Vec::new()
            } else {
                state.shut_down();
                vec![Effect::HideIcon]
            }
        }
    };

    (state, effects)
}
