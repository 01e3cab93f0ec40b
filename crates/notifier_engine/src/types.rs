use std::io;
use std::time::Duration;

use notifier_core::{ProxyMode, StatusReport, StatusStrings};
use thiserror::Error;

pub type WorkerId = u64;

/// Point-in-time view of one worker, captured at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSnapshot {
    pub id: WorkerId,
    pub is_running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProxySettings {
    pub mode: ProxyMode,
    /// `host:port` in proxy mode, the script URL in PAC mode.
    pub address: Option<String>,
}

impl ProxySettings {
    pub fn direct() -> Self {
        Self::default()
    }

    /// Text quoted in the tooltip's system proxy line, if any.
    pub fn summary(&self) -> Option<&str> {
        match self.mode {
            ProxyMode::Direct => None,
            ProxyMode::Proxy | ProxyMode::Pac => {
                self.address.as_deref().filter(|addr| !addr.is_empty())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotifierSettings {
    /// Idle time after the latest trigger before a refresh runs.
    pub quiet_interval: Duration,
    /// Upper bound on a single worker's notification text fetch.
    pub fetch_timeout: Duration,
    pub strings: StatusStrings,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            quiet_interval: Duration::from_millis(1000),
            fetch_timeout: Duration::from_secs(5),
            strings: StatusStrings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    StatusReady(StatusReport),
}

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
}
