use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use notifier_core::{compose_display_text, no_response_line, StatusPlan, StatusStrings};
use notifier_logging::{notifier_debug, notifier_error, notifier_warn};

use crate::aggregate::collect_ordered;
use crate::{WorkerRegistry, WorkerSnapshot};

/// Builds the tooltip text for a snapshot of running workers.
pub struct StatusTextBuilder {
    registry: Arc<dyn WorkerRegistry>,
    fetch_timeout: Duration,
    strings: StatusStrings,
}

impl StatusTextBuilder {
    pub fn new(
        registry: Arc<dyn WorkerRegistry>,
        fetch_timeout: Duration,
        strings: StatusStrings,
    ) -> Self {
        Self {
            registry,
            fetch_timeout,
            strings,
        }
    }

    pub async fn build(&self, workers: &[WorkerSnapshot], sys_proxy_info: Option<&str>) -> String {
        let plan = StatusPlan::for_count(workers.len());
        let lines = match plan.fixed_line(&self.strings) {
            Some(line) => vec![line],
            None => self.fetch_worker_texts(workers).await,
        };
        compose_display_text(lines, sys_proxy_info, &self.strings)
    }

    async fn fetch_worker_texts(&self, workers: &[WorkerSnapshot]) -> Vec<String> {
        let ids: Vec<_> = workers.iter().map(|worker| worker.id).collect();
        notifier_debug!("Fetching notification text for workers {:?}", ids);

        let registry = Arc::clone(&self.registry);
        let timeout = self.fetch_timeout;
        let strings = self.strings.clone();
        collect_ordered(ids.len(), move |index| {
            let id = ids[index];
            let registry = Arc::clone(&registry);
            let fallback = no_response_line(id, &strings);
            async move {
                let fetch = tokio::time::timeout(timeout, registry.notification_text(id));
                match AssertUnwindSafe(fetch).catch_unwind().await {
                    Ok(Ok(text)) => text,
                    Ok(Err(_)) => {
                        notifier_warn!("Worker {} gave no text within {:?}", id, timeout);
                        fallback
                    }
                    Err(_) => {
                        notifier_error!("Worker {} panicked while describing itself", id);
                        fallback
                    }
                }
            }
        })
        .await
    }
}
