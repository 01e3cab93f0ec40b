//! Simulated proxy server connections for the headless shell.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notifier_engine::InMemoryWorkerRegistry;
use notifier_logging::{notifier_debug, notifier_warn};

use super::config::WorkerConfig;

pub fn build_registry(workers: &[WorkerConfig]) -> InMemoryWorkerRegistry {
    let registry = InMemoryWorkerRegistry::new();
    for worker in workers {
        registry.add_worker(
            worker.id,
            worker.text.clone(),
            Duration::from_millis(worker.delay_ms),
        );
        if worker.running {
            registry.set_running(worker.id, true);
        }
    }
    registry
}

/// Starts or stops one worker per period, round-robin, until `stop` is set.
///
/// Each step touches the registry several times in quick succession, the way a real
/// server start does (state flip, then a few latency probes rewriting its text).
pub fn spawn_churn(
    registry: Arc<InMemoryWorkerRegistry>,
    workers: Vec<WorkerConfig>,
    period: Duration,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut step = 0usize;
        while !stop.load(Ordering::SeqCst) && !workers.is_empty() {
            thread::sleep(period);
            let worker = &workers[step % workers.len()];
            let running = !registry.is_running(worker.id);
            notifier_debug!("Simulation: worker {} running={}", worker.id, running);
            registry.set_running(worker.id, running);
            for probe in 1..=3 {
                let latency_ms = 20 + (step * 37 + probe * 11) % 180;
                registry.set_text(worker.id, format!("{} {}ms", worker.text, latency_ms));
            }
            step += 1;
        }
    })
}

/// Waits for the churn thread; returns `false` if it died from a panic.
pub fn join_churn(churn: JoinHandle<()>) -> bool {
    match churn.join() {
        Ok(()) => true,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            notifier_warn!("Simulation thread panicked: {}", reason);
            false
        }
    }
}
