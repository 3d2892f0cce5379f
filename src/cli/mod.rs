mod commands;
pub mod context;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliError, CliMode, CommandError, CommandResult, LoopControl, ShellContext};
pub use shell::run_cli;
