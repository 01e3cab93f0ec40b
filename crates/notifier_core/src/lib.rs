//! Notifier core: status text policy, icon composition and the pure state machine
//! that applies status reports on the display-owning thread.
mod effect;
mod icon;
mod msg;
mod state;
mod status_text;
mod update;
mod view_model;

pub use effect::Effect;
pub use icon::{compose_icon, IconImage, IconState, ProxyMode, Rgba};
pub use msg::Msg;
pub use state::{AppState, PassId, StatusReport};
pub use status_text::{
    compose_display_text, cut_chars, finalize_display_text, no_response_line, StatusPlan,
    StatusStrings, DETAILED_WORKER_LIMIT, MAX_DISPLAY_CHARS, MAX_PROXY_INFO_CHARS,
};
pub use update::update;
pub use view_model::AppViewModel;
