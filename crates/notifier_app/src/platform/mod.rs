mod app;
mod config;
mod effects;
mod logging;
mod persist;
mod simulation;
mod sink;

pub use app::run_app;
