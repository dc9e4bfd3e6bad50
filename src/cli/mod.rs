pub mod args;
pub mod commands;

pub use args::{Cli, Commands, FilterCriteria};
pub use commands::{init_logging, run};
