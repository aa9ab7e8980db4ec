pub mod commands;
pub mod handlers;
pub mod interval;
pub mod registry;

pub use commands::Cli;
pub use interval::parse_interval;
pub use registry::{Command, CommandRegistry, Handler, State};
