use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use notifier_logging::notifier_debug;

use crate::{ProxySettings, WorkerId, WorkerSnapshot};

pub type SubscriptionId = u64;

/// Callback fired whenever any worker's state might have changed.
pub type StateListener = Arc<dyn Fn() + Send + Sync>;

/// Source of workers and their notification texts.
#[async_trait::async_trait]
pub trait WorkerRegistry: Send + Sync {
    /// All known workers in registry order.
    fn list_active_workers(&self) -> Vec<WorkerSnapshot>;

    /// The worker's own one-line description. May wait on the worker's internals.
    async fn notification_text(&self, id: WorkerId) -> String;

    fn subscribe(&self, listener: StateListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

pub trait SystemProxy: Send + Sync {
    fn current(&self) -> ProxySettings;
}

/// System proxy source that reports whatever it was last told.
#[derive(Debug, Default)]
pub struct StaticSystemProxy {
    settings: Mutex<ProxySettings>,
}

impl StaticSystemProxy {
    pub fn new(settings: ProxySettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    pub fn set(&self, settings: ProxySettings) {
        *lock(&self.settings) = settings;
    }
}

impl SystemProxy for StaticSystemProxy {
    fn current(&self) -> ProxySettings {
        lock(&self.settings).clone()
    }
}

#[derive(Debug, Clone)]
struct WorkerEntry {
    id: WorkerId,
    running: bool,
    text: String,
    text_delay: Duration,
}

#[derive(Default)]
struct RegistryInner {
    workers: Vec<WorkerEntry>,
    listeners: BTreeMap<SubscriptionId, StateListener>,
    next_subscription: SubscriptionId,
}

/// Registry kept entirely in memory; every mutation notifies the subscribers.
#[derive(Default)]
pub struct InMemoryWorkerRegistry {
    inner: Mutex<RegistryInner>,
    text_fetches: AtomicUsize,
}

impl InMemoryWorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stopped worker whose text takes `text_delay` to produce.
    pub fn add_worker(&self, id: WorkerId, text: impl Into<String>, text_delay: Duration) {
        lock(&self.inner).workers.push(WorkerEntry {
            id,
            running: false,
            text: text.into(),
            text_delay,
        });
        self.notify();
    }

    pub fn remove_worker(&self, id: WorkerId) {
        lock(&self.inner).workers.retain(|worker| worker.id != id);
        self.notify();
    }

    pub fn set_running(&self, id: WorkerId, running: bool) {
        self.update_worker(id, |worker| worker.running = running);
    }

    pub fn set_text(&self, id: WorkerId, text: impl Into<String>) {
        let text = text.into();
        self.update_worker(id, move |worker| worker.text = text);
    }

    pub fn is_running(&self, id: WorkerId) -> bool {
        lock(&self.inner)
            .workers
            .iter()
            .any(|worker| worker.id == id && worker.running)
    }

    /// Number of `notification_text` calls served so far.
    pub fn text_fetch_count(&self) -> usize {
        self.text_fetches.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    fn update_worker(&self, id: WorkerId, apply: impl FnOnce(&mut WorkerEntry)) {
        let found = {
            let mut inner = lock(&self.inner);
            match inner.workers.iter_mut().find(|worker| worker.id == id) {
                Some(worker) => {
                    apply(worker);
                    true
                }
                None => false,
            }
        };
        if found {
            self.notify();
        } else {
            notifier_debug!("Ignoring update for unknown worker {}", id);
        }
    }

    fn notify(&self) {
        // Listeners run outside the lock so they may call back into the registry.
        let listeners: Vec<StateListener> = lock(&self.inner).listeners.values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }
}

#[async_trait::async_trait]
impl WorkerRegistry for InMemoryWorkerRegistry {
    fn list_active_workers(&self) -> Vec<WorkerSnapshot> {
        lock(&self.inner)
            .workers
            .iter()
            .map(|worker| WorkerSnapshot {
                id: worker.id,
                is_running: worker.running,
            })
            .collect()
    }

    async fn notification_text(&self, id: WorkerId) -> String {
        self.text_fetches.fetch_add(1, Ordering::SeqCst);
        let entry = lock(&self.inner)
            .workers
            .iter()
            .find(|worker| worker.id == id)
            .map(|worker| (worker.text.clone(), worker.text_delay));

        match entry {
            Some((text, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                text
            }
            // Removed after the pass took its snapshot.
            None => String::new(),
        }
    }

    fn subscribe(&self, listener: StateListener) -> SubscriptionId {
        let mut inner = lock(&self.inner);
        inner.next_subscription += 1;
        let id = inner.next_subscription;
        inner.listeners.insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.inner).listeners.remove(&id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
