use notifier_core::{compose_icon, Effect, IconImage, Msg};
use notifier_engine::NotifierEvent;
use notifier_logging::{notifier_debug, notifier_error, notifier_info};

use super::sink::FileDisplaySink;

/// Executes core effects against the display sink. Lives on the display-owning thread.
pub struct EffectRunner {
    sink: FileDisplaySink,
    base_icon: IconImage,
}

impl EffectRunner {
    pub fn new(sink: FileDisplaySink, base_icon: IconImage) -> Self {
        Self { sink, base_icon }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetTooltip { text } => match self.sink.set_tooltip(&text) {
                    Ok(true) => notifier_info!("Tooltip: {}", text.replace('\n', " | ")),
                    Ok(false) => {}
                    Err(err) => notifier_error!("Failed to update tooltip: {}", err),
                },
                Effect::SetIcon { state } => {
                    let icon = compose_icon(&self.base_icon, state);
                    match self.sink.set_icon(&icon) {
                        Ok(()) => notifier_debug!(
                            "Icon redrawn: mode {:?}, running {}",
                            state.mode,
                            state.running
                        ),
                        Err(err) => notifier_error!("Failed to update icon: {}", err),
                    }
                }
                Effect::HideIcon => {
                    if let Err(err) = self.sink.hide() {
                        notifier_error!("Failed to hide icon: {}", err);
                    }
                }
            }
        }
    }
}

pub fn event_to_msg(event: NotifierEvent) -> Msg {
    match event {
        NotifierEvent::StatusReady(report) => Msg::StatusReported(report),
    }
}
