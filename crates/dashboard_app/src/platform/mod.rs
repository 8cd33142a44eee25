mod app;
pub mod config;
mod effects;
mod logging;
mod page;

pub use app::run_app;
