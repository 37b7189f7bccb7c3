// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod motion;
pub mod quality;
pub mod runtime;
pub mod sample;
pub mod score;
pub mod session;
pub mod time_series;
pub mod tracking;
pub mod ui;
