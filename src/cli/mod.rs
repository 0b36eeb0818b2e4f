pub mod commands;
pub mod format;

pub use commands::{Cli, Commands, run};
