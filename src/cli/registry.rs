use std::collections::HashMap;

use crate::cli::handlers;
use crate::config::Config;
use crate::domain::User;
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::{SqliteStorage, SqliteUserRepository};
use crate::storage::traits::UserRepository;

/// Everything a handler may touch
pub struct State {
    pub config: Config,
    pub storage: SqliteStorage,
}

impl State {
    pub fn new(config: Config, storage: SqliteStorage) -> Self {
        Self { config, storage }
    }
}

/// A verb and its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Positional argument `index`, or an error naming what is missing
    pub fn arg(&self, index: usize, what: &str) -> GatorResult<&str> {
        self.args.get(index).map(String::as_str).ok_or_else(|| {
            GatorError::InvalidInput(format!("{} requires <{}>", self.name, what))
        })
    }
}

pub type PlainHandler = fn(&mut State, &Command) -> GatorResult<()>;
pub type AuthenticatedHandler = fn(&mut State, &Command, &User) -> GatorResult<()>;

/// The two handler shapes a command can have
#[derive(Clone, Copy)]
pub enum Handler {
    Plain(PlainHandler),
    /// Runs only once the current user resolves to a stored user
    Authenticated(AuthenticatedHandler),
}

pub struct CommandRegistry {
    handlers: HashMap<&'static str, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with every built-in command
    pub fn with_default_commands() -> Self {
        let mut registry = Self::new();

        registry.register("register", handlers::register);
        registry.register("login", handlers::login);
        registry.register("users", handlers::users);
        registry.register("reset", handlers::reset);
        registry.register("feeds", handlers::feeds);
        registry.register("agg", handlers::agg);

        registry.register_authenticated("addfeed", handlers::add_feed);
        registry.register_authenticated("follow", handlers::follow);
        registry.register_authenticated("unfollow", handlers::unfollow);
        registry.register_authenticated("following", handlers::following);

        registry
    }

    pub fn register(&mut self, name: &'static str, handler: PlainHandler) {
        self.handlers.insert(name, Handler::Plain(handler));
    }

    pub fn register_authenticated(&mut self, name: &'static str, handler: AuthenticatedHandler) {
        self.handlers.insert(name, Handler::Authenticated(handler));
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn run(&self, state: &mut State, cmd: &Command) -> GatorResult<()> {
        let handler = self
            .handlers
            .get(cmd.name.as_str())
            .copied()
            .ok_or_else(|| GatorError::UnknownCommand(cmd.name.clone()))?;

        tracing::debug!(command = %cmd.name, args = ?cmd.args, "running command");
        match handler {
            Handler::Plain(handler) => handler(state, cmd),
            Handler::Authenticated(handler) => {
                let user = current_user(state)?;
                handler(state, cmd, &user)
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_default_commands()
    }
}

/// Resolve the config's current user name to a stored user
pub fn current_user(state: &State) -> GatorResult<User> {
    let name = state.config.current_user_name.as_deref().ok_or_else(|| {
        GatorError::Auth("no current user, run `register <name>` or `login <name>`".to_string())
    })?;

    SqliteUserRepository::new(state.storage.clone())
        .get_by_name(name)?
        .ok_or_else(|| GatorError::Auth(format!("current user {} does not exist", name)))
}
