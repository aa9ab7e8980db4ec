use std::path::PathBuf;

use clap::Parser;

const COMMANDS_HELP: &str = "\
Commands:
  register <name>        Create a user and make it the current user
  login <name>           Switch the current user
  users                  List users
  reset                  Delete all users, feeds and follows
  addfeed <name> <url>   Add a feed and follow it
  feeds                  List all feeds
  follow <url>           Follow an existing feed
  unfollow <url>         Stop following a feed
  following              List the feeds the current user follows
  agg <interval>         Poll feeds forever, e.g. `agg 1m` or `agg 1h30m`";

#[derive(Parser, Debug)]
#[command(name = "gator")]
#[command(about = "Blog aggregator: follow RSS feeds and collect their posts")]
#[command(version)]
#[command(after_help = COMMANDS_HELP)]
pub struct Cli {
    /// Path to the config file (defaults to ~/.gatorconfig.json)
    #[arg(long, env = "GATOR_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics written to stderr
    #[arg(long, env = "GATOR_LOG")]
    pub log_level: Option<String>,

    /// Command to run
    pub command: String,

    /// Arguments passed to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
