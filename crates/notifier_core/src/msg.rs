#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Background runtime finished a refresh pass.
    StatusReported(crate::StatusReport),
    /// UI shell is shutting the notifier down.
    ShutdownRequested,
}
