use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use notifier_core::{IconState, StatusReport};
use notifier_logging::{notifier_debug, notifier_info};
use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;

use crate::{
    DebounceScheduler, NotifierError, NotifierEvent, NotifierSettings, StatusTextBuilder,
    SubscriptionId, SystemProxy, WorkerRegistry, WorkerSnapshot,
};

/// Everything one refresh pass needs; shared by the debounce task.
struct RefreshPipeline {
    registry: Arc<dyn WorkerRegistry>,
    proxy: Arc<dyn SystemProxy>,
    builder: StatusTextBuilder,
    next_pass: AtomicU64,
    event_tx: mpsc::Sender<NotifierEvent>,
    cancel: CancellationToken,
}

impl RefreshPipeline {
    async fn run_pass(&self) {
        let pass = self.next_pass.fetch_add(1, Ordering::SeqCst) + 1;

        // Snapshot once; registry changes during the pass trigger the next one.
        let workers: Vec<WorkerSnapshot> = self
            .registry
            .list_active_workers()
            .into_iter()
            .filter(|worker| worker.is_running)
            .collect();
        let proxy = self.proxy.current();

        let text = self.builder.build(&workers, proxy.summary()).await;
        let icon = IconState {
            mode: proxy.mode,
            running: !workers.is_empty(),
        };

        if self.cancel.is_cancelled() {
            notifier_debug!("Discarding pass {} finished after shutdown", pass);
            return;
        }
        notifier_debug!(
            "Pass {} done: {} running, mode {:?}",
            pass,
            workers.len(),
            proxy.mode
        );
        let _ = self
            .event_tx
            .send(NotifierEvent::StatusReady(StatusReport { pass, text, icon }));
    }
}

/// Owns the notifier runtime. Created by the application shell with [`NotifierHandle::start`]
/// and torn down with [`NotifierHandle::shutdown`] (or on drop).
///
/// Status reports are delivered over a channel so the thread that owns the display can
/// apply them; see [`NotifierHandle::try_recv`].
pub struct NotifierHandle {
    runtime: Option<Runtime>,
    scheduler: DebounceScheduler,
    registry: Arc<dyn WorkerRegistry>,
    subscription: Option<SubscriptionId>,
    event_rx: mpsc::Receiver<NotifierEvent>,
}

impl NotifierHandle {
    /// Subscribes to `registry` and schedules the first refresh immediately.
    pub fn start(
        settings: NotifierSettings,
        registry: Arc<dyn WorkerRegistry>,
        proxy: Arc<dyn SystemProxy>,
    ) -> Result<Self, NotifierError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("notifier-runtime")
            .enable_all()
            .build()?;

        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let pipeline = Arc::new(RefreshPipeline {
            registry: Arc::clone(&registry),
            proxy,
            builder: StatusTextBuilder::new(
                Arc::clone(&registry),
                settings.fetch_timeout,
                settings.strings,
            ),
            next_pass: AtomicU64::new(0),
            event_tx,
            cancel: cancel.clone(),
        });

        // Sharing the token stops publishing as soon as the scheduler quits.
        let scheduler = DebounceScheduler::with_cancellation(
            runtime.handle(),
            settings.quiet_interval,
            cancel,
            move || {
                let pipeline = Arc::clone(&pipeline);
                async move { pipeline.run_pass().await }
            },
        );

        let trigger = scheduler.clone();
        let subscription = registry.subscribe(Arc::new(move || trigger.request_run()));
        scheduler.request_run();

        notifier_info!(
            "Notifier started (quiet interval {:?}, fetch timeout {:?})",
            settings.quiet_interval,
            settings.fetch_timeout
        );

        Ok(Self {
            runtime: Some(runtime),
            scheduler,
            registry,
            subscription: Some(subscription),
            event_rx,
        })
    }

    pub fn request_refresh(&self) {
        self.scheduler.request_run();
    }

    /// Next status event, if one is waiting. Call from the display-owning thread.
    pub fn try_recv(&self) -> Option<NotifierEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn is_shut_down(&self) -> bool {
        self.scheduler.is_quit()
    }

    /// Stops scheduling and unsubscribes from the registry. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.registry.unsubscribe(subscription);
            self.scheduler.quit();
            notifier_info!("Notifier shut down");
        }
    }
}

impl Drop for NotifierHandle {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
