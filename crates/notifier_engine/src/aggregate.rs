//! Ordered fan-out/fan-in over independent async fetches.

use std::future::Future;
use std::sync::{Arc, Mutex};

use notifier_logging::notifier_warn;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

type OnDone<T> = Box<dyn FnOnce(Vec<T>) + Send>;

/// Per-call result buffer; dropped right after `on_done` is handed the results.
struct Collector<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
    on_done: Option<OnDone<T>>,
}

/// Runs `fetch(i)` for every `i` in `0..n` as separate tasks on `handle` and calls
/// `on_done` exactly once with the results in index order.
///
/// With `n == 0`, `on_done` runs before this function returns.
pub fn run_all<T, F, Fut, D>(handle: &Handle, n: usize, fetch: F, on_done: D)
where
    T: Send + 'static,
    F: Fn(usize) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    D: FnOnce(Vec<T>) + Send + 'static,
{
    if n == 0 {
        on_done(Vec::new());
        return;
    }

    let collector = Arc::new(Mutex::new(Collector {
        slots: (0..n).map(|_| None).collect(),
        remaining: n,
        on_done: Some(Box::new(on_done)),
    }));

    for index in 0..n {
        let pending = fetch(index);
        let collector = Arc::clone(&collector);
        handle.spawn(async move {
            let value = pending.await;
            deliver(&collector, index, value);
        });
    }
}

fn deliver<T>(collector: &Mutex<Collector<T>>, index: usize, value: T) {
    let finished = {
        let mut guard = collector
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.slots[index] = Some(value);
        guard.remaining -= 1;
        if guard.remaining == 0 {
            let results: Vec<T> = guard.slots.drain(..).flatten().collect();
            guard.on_done.take().map(|on_done| (on_done, results))
        } else {
            None
        }
    };

    // Outside the lock: the callback may be arbitrarily slow.
    if let Some((on_done, results)) = finished {
        on_done(results);
    }
}

/// Awaitable form of [`run_all`] for callers already inside the runtime.
///
/// Fetches are expected not to panic. If one does, its slot is never filled and an empty
/// vector is returned once the remaining tasks have finished.
pub async fn collect_ordered<T, F, Fut>(n: usize, fetch: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(usize) -> Fut + Send,
    Fut: Future<Output = T> + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();
    run_all(&Handle::current(), n, fetch, move |results| {
        let _ = done_tx.send(results);
    });
    match done_rx.await {
        Ok(results) => results,
        Err(_) => {
            notifier_warn!("Aggregation of {} fetches abandoned", n);
            Vec::new()
        }
    }
}
