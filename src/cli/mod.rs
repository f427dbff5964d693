// ABOUTME: Command line interface module for the stencil step runner
// ABOUTME: Exports argument parsing, configuration, and the application driver

pub mod app;
pub mod args;
pub mod config;

pub use app::App;
pub use args::Args;
pub use config::Config;
