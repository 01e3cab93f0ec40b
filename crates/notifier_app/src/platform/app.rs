use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use notifier_core::{update, AppState, IconImage, Msg};
use notifier_engine::{NotifierHandle, StaticSystemProxy};
use notifier_logging::{notifier_info, notifier_warn};

use super::config::{self, LoadOutcome};
use super::effects::{event_to_msg, EffectRunner};
use super::logging;
use super::simulation;
use super::sink::FileDisplaySink;

/// Plain dark tile the status overlays are drawn on.
const BASE_ICON_COLOR: [u8; 4] = [48, 48, 56, 255];
/// How often the display thread drains notifier events.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = config::config_path();
    let (config, outcome) = config::load_or_create(&config_path);
    logging::initialize(config.log_destination, config.log_level());
    match outcome {
        LoadOutcome::Loaded => notifier_info!("Loaded config from {:?}", config_path),
        LoadOutcome::Created => notifier_info!("Wrote default config to {:?}", config_path),
        LoadOutcome::CreateFailed(err) => {
            notifier_warn!("Could not write default config to {:?}: {}", config_path, err)
        }
        LoadOutcome::Invalid(err) => {
            notifier_warn!("Ignoring config at {:?}: {}", config_path, err)
        }
    }

    let registry = Arc::new(simulation::build_registry(&config.workers));
    let proxy = Arc::new(StaticSystemProxy::new(config.proxy_settings()));
    let mut notifier = NotifierHandle::start(config.notifier_settings(), registry.clone(), proxy)?;

    let mut shell = DisplayShell::new(
        AppState::with_tooltip(config.status_strings().idle_description),
        EffectRunner::new(
            FileDisplaySink::new(config.output_dir.clone()),
            IconImage::filled(config.icon_size, BASE_ICON_COLOR),
        ),
    );

    let stop = Arc::new(AtomicBool::new(false));
    let churn = simulation::spawn_churn(
        registry,
        config.workers.clone(),
        Duration::from_millis(config.churn_interval_ms),
        stop.clone(),
    );

    notifier_info!(
        "Running for {}s, writing status to {:?}",
        config.run_for_secs,
        config.output_dir
    );
    let deadline = Instant::now() + Duration::from_secs(config.run_for_secs);
    while Instant::now() < deadline {
        shell.process_pending(&notifier);
        thread::sleep(POLL_INTERVAL);
    }

    stop.store(true, Ordering::SeqCst);
    simulation::join_churn(churn);

    notifier.shutdown();
    shell.dispatch(Msg::ShutdownRequested);
    // Anything still queued belongs to a pass that finished before shutdown.
    shell.process_pending(&notifier);

    let view = shell.state.view();
    notifier_info!(
        "Final tooltip after pass {:?} ({} stale reports dropped): {}",
        view.last_pass,
        view.stale_reports,
        view.tooltip.replace('\n', " | ")
    );
    Ok(())
}

/// Display-thread side: owns the core state and the sink.
struct DisplayShell {
    state: AppState,
    effects: EffectRunner,
}

impl DisplayShell {
    fn new(state: AppState, effects: EffectRunner) -> Self {
        Self { state, effects }
    }

    fn process_pending(&mut self, notifier: &NotifierHandle) {
        while let Some(event) = notifier.try_recv() {
            self.dispatch(event_to_msg(event));
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if self.state.consume_dirty() {
            self.effects.run(effects);
        }
    }
}
