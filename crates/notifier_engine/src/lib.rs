//! Notifier engine: debounced refresh scheduling and asynchronous status aggregation.
mod aggregate;
mod builder;
mod debounce;
mod notifier;
mod registry;
mod types;

pub use aggregate::{collect_ordered, run_all};
pub use builder::StatusTextBuilder;
pub use debounce::DebounceScheduler;
pub use notifier::NotifierHandle;
pub use registry::{
    InMemoryWorkerRegistry, StateListener, StaticSystemProxy, SubscriptionId, SystemProxy,
    WorkerRegistry,
};
pub use types::{
    NotifierError, NotifierEvent, NotifierSettings, ProxySettings, WorkerId, WorkerSnapshot,
};
