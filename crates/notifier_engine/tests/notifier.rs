use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use notifier_core::{IconState, ProxyMode, StatusReport, StatusStrings};
use notifier_engine::{
    InMemoryWorkerRegistry, NotifierEvent, NotifierHandle, NotifierSettings, ProxySettings,
    StaticSystemProxy,
};

fn settings() -> NotifierSettings {
    NotifierSettings {
        quiet_interval: Duration::from_millis(30),
        fetch_timeout: Duration::from_millis(500),
        strings: StatusStrings::default(),
    }
}

fn next_report(handle: &NotifierHandle, within: Duration) -> Option<StatusReport> {
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if let Some(NotifierEvent::StatusReady(report)) = handle.try_recv() {
            return Some(report);
        }
        thread::sleep(Duration::from_millis(5));
    }
    None
}

fn start(
    registry: &Arc<InMemoryWorkerRegistry>,
    proxy: ProxySettings,
) -> (NotifierHandle, Arc<StaticSystemProxy>) {
    notifier_logging::initialize_for_tests();
    let proxy = Arc::new(StaticSystemProxy::new(proxy));
    let handle = NotifierHandle::start(settings(), registry.clone(), proxy.clone())
        .expect("notifier starts");
    (handle, proxy)
}

#[test]
fn start_publishes_initial_status() {
    let registry = Arc::new(InMemoryWorkerRegistry::new());
    let (handle, _proxy) = start(&registry, ProxySettings::direct());

    let report = next_report(&handle, Duration::from_secs(2)).expect("initial report");
    assert_eq!(report.pass, 1);
    assert_eq!(report.text, StatusStrings::default().idle_description);
    assert_eq!(
        report.icon,
        IconState {
            mode: ProxyMode::Direct,
            running: false
        }
    );
    assert_eq!(registry.listener_count(), 1);
}

#[test]
fn registry_changes_are_coalesced_into_one_pass() {
    let registry = Arc::new(InMemoryWorkerRegistry::new());
    let (handle, _proxy) = start(&registry, ProxySettings::direct());
    let initial = next_report(&handle, Duration::from_secs(2)).expect("initial report");

    // A burst of changes well inside one quiet interval.
    registry.add_worker(1, "alpha", Duration::ZERO);
    registry.add_worker(2, "beta", Duration::from_millis(20));
    registry.set_running(1, true);
    registry.set_running(2, true);

    let report = next_report(&handle, Duration::from_secs(2)).expect("refresh report");
    assert_eq!(report.pass, initial.pass + 1);
    assert_eq!(report.text, "alpha\nbeta");
    assert!(report.icon.running);

    thread::sleep(Duration::from_millis(150));
    assert!(handle.try_recv().is_none());
}

#[test]
fn proxy_mode_and_address_reach_the_report() {
    let registry = Arc::new(InMemoryWorkerRegistry::new());
    for id in 1..=3 {
        registry.add_worker(id, format!("server {id}"), Duration::ZERO);
        registry.set_running(id, true);
    }
    let (handle, _proxy) = start(
        &registry,
        ProxySettings {
            mode: ProxyMode::Pac,
            address: Some("http://127.0.0.1:8080/pac".to_string()),
        },
    );

    let report = next_report(&handle, Duration::from_secs(2)).expect("report");
    assert_eq!(
        report.text,
        "3 servers running\nCurrent system proxy: http://127.0.0.1:8080/pac"
    );
    assert_eq!(
        report.icon,
        IconState {
            mode: ProxyMode::Pac,
            running: true
        }
    );
}

#[test]
fn manual_refresh_picks_up_proxy_change() {
    let registry = Arc::new(InMemoryWorkerRegistry::new());
    let (handle, proxy) = start(&registry, ProxySettings::direct());
    next_report(&handle, Duration::from_secs(2)).expect("initial report");

    proxy.set(ProxySettings {
        mode: ProxyMode::Proxy,
        address: Some("127.0.0.1:1080".to_string()),
    });
    handle.request_refresh();

    let report = next_report(&handle, Duration::from_secs(2)).expect("refresh report");
    assert_eq!(report.icon.mode, ProxyMode::Proxy);
    assert!(report.text.ends_with("Current system proxy: 127.0.0.1:1080"));
}

#[test]
fn shutdown_unsubscribes_and_stops_publishing() {
    let registry = Arc::new(InMemoryWorkerRegistry::new());
    let (mut handle, _proxy) = start(&registry, ProxySettings::direct());
    next_report(&handle, Duration::from_secs(2)).expect("initial report");

    handle.shutdown();
    handle.shutdown();
    assert!(handle.is_shut_down());
    assert_eq!(registry.listener_count(), 0);

    registry.add_worker(9, "late", Duration::ZERO);
    registry.set_running(9, true);
    handle.request_refresh();

    assert!(next_report(&handle, Duration::from_millis(300)).is_none());
}

#[test]
fn pass_in_flight_at_shutdown_is_discarded() {
    let registry = Arc::new(InMemoryWorkerRegistry::new());
    registry.add_worker(1, "slow", Duration::from_millis(300));
    registry.set_running(1, true);
    let (mut handle, _proxy) = start(&registry, ProxySettings::direct());

    // Let the first pass start fetching, then shut down before it finishes.
    thread::sleep(Duration::from_millis(100));
    handle.shutdown();

    assert!(next_report(&handle, Duration::from_millis(600)).is_none());
}
