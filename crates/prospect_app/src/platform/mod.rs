mod app;
mod command;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
