//! Trailing-edge debounce for the refresh action.
//!
//! One task owns the timer. Every trigger re-arms it; when it fires the action runs to
//! completion before the next trigger is looked at, so runs never overlap and any number
//! of triggers received during a run collapse into a single follow-up run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use notifier_logging::{notifier_debug, notifier_trace};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::time::{sleep, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

type Action = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Cheap to clone; all clones drive the same timer. Dropping the last clone quits.
#[derive(Clone)]
pub struct DebounceScheduler {
    // Holds at most one stored permit, however many triggers arrive while nobody waits.
    trigger: Arc<Notify>,
    cancel: CancellationToken,
    _quit_on_drop: Arc<DropGuard>,
}

impl DebounceScheduler {
    /// Spawns the timer task on `handle`. The action runs at most once per quiet period.
    pub fn spawn<F, Fut>(handle: &Handle, quiet_interval: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::with_cancellation(handle, quiet_interval, CancellationToken::new(), action)
    }

    /// Like [`DebounceScheduler::spawn`], but quitting cancels the given token, so code
    /// outside the scheduler can observe the shutdown.
    pub fn with_cancellation<F, Fut>(
        handle: &Handle,
        quiet_interval: Duration,
        cancel: CancellationToken,
        action: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let trigger = Arc::new(Notify::new());
        let action: Action = Arc::new(move || action().boxed());

        handle.spawn(run_loop(
            Arc::clone(&trigger),
            quiet_interval,
            cancel.clone(),
            action,
        ));

        Self {
            trigger,
            _quit_on_drop: Arc::new(cancel.clone().drop_guard()),
            cancel,
        }
    }

    /// Asks for the action to run once things have been quiet. Never blocks.
    pub fn request_run(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.trigger.notify_one();
    }

    /// Cancels the pending run and every future one. A run already executing completes.
    pub fn quit(&self) {
        self.cancel.cancel();
    }

    pub fn is_quit(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

async fn run_loop(
    trigger: Arc<Notify>,
    quiet_interval: Duration,
    cancel: CancellationToken,
    action: Action,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = trigger.notified() => {}
        }

        let deadline = sleep(quiet_interval);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    notifier_debug!("Debounce quit with a run pending");
                    return;
                }
                _ = trigger.notified() => {
                    notifier_trace!("Debounce re-armed");
                    deadline.as_mut().reset(Instant::now() + quiet_interval);
                }
                _ = &mut deadline => break,
            }
        }

        action().await;
    }
    notifier_debug!("Debounce task stopped");
}
