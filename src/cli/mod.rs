//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the command runners.

pub mod app;
pub mod args;
pub mod presenter;

// Re-export commonly used types
pub use app::{handle_config_command, load_merged_config, run_record, run_recover, EXIT_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use presenter::Presenter;
