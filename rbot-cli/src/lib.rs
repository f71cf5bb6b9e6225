//! # rbot-cli
//!
//! The `rbot` binary's building blocks: argument parsing, config composition, demo routines
//! and the run loop wiring.

pub mod cli;
pub mod routines;
pub mod runner;

pub use cli::{load_config, BotConfig, Cli, Commands, DEFAULT_LOG_FILE};
pub use routines::{demo_registry, register_demo_routines};
pub use runner::run_bot;
