use crate::{IconState, PassId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub tooltip: String,
    /// `None` until the first report arrives.
    pub icon: Option<IconState>,
    pub last_pass: Option<PassId>,
    /// Reports dropped because a newer pass had already been applied.
    pub stale_reports: u64,
    pub shut_down: bool,
}
