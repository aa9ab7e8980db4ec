use std::fs;

use clap::Parser;

use gator::cli::{Cli, Command, CommandRegistry, State};
use gator::config::Config;
use gator::errors::GatorResult;
use gator::logging;
use gator::storage::SqliteStorage;

fn main() {
    if let Err(e) = run() {
        println!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> GatorResult<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => return Err(e.into()),
    };

    // Load configuration
    let config = Config::load(cli.config)?;
    logging::init(cli.log_level.as_deref().unwrap_or(&config.log_level));

    // Initialize storage
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let storage = SqliteStorage::new(&db_path)?;

    let mut state = State::new(config, storage);
    let registry = CommandRegistry::with_default_commands();

    registry.run(&mut state, &Command::new(cli.command, cli.args))
}
