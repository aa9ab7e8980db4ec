use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatorError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    // Parsing errors
    #[error("Failed to decode feed from {0}")]
    Decode(String),

    // Lookup errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Not logged in: {0}")]
    Auth(String),

    // Scheduler errors
    #[error("No feeds to fetch, add one with `addfeed <name> <url>`")]
    NoFeeds,

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    Usage(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GatorError {
    fn from(err: reqwest::Error) -> Self {
        match err.url() {
            Some(url) => GatorError::Network(format!("{}: {}", url, err)),
            None => GatorError::Network(err.to_string()),
        }
    }
}

impl From<clap::Error> for GatorError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        GatorError::Usage(rendered.trim_start_matches("error: ").trim_end().to_string())
    }
}

impl GatorError {
    /// True when a SQLite error is a UNIQUE constraint violation
    pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
}

pub type GatorResult<T> = Result<T, GatorError>;
