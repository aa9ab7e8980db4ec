use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{GatorError, GatorResult};

pub const CONFIG_FILE_NAME: &str = ".gatorconfig.json";
const DEFAULT_DB_FILE_NAME: &str = "gator.db";

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Session state persisted between invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, alias = "db_url", skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_name: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(skip)]
    path: PathBuf,

    #[serde(skip)]
    db_override: Option<PathBuf>,
}

impl Config {
    /// `~/.gatorconfig.json`
    pub fn default_path() -> GatorResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or_else(|| GatorError::Config("could not locate home directory".to_string()))
    }

    /// Load `.env`, then the config file at `path` (or the default location)
    pub fn load(path: Option<PathBuf>) -> GatorResult<Self> {
        dotenvy::dotenv().ok();

        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        let mut config = Self::load_from(&path)?;
        config.db_override = std::env::var_os("GATOR_DB_PATH").map(PathBuf::from);
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> GatorResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::empty(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| GatorError::Config(format!("{}: {}", path.display(), e)))?;
        config.path = path.to_path_buf();
        // An empty name is how an unset user is written by older configs
        if config.current_user_name.as_deref() == Some("") {
            config.current_user_name = None;
        }
        Ok(config)
    }

    fn empty(path: PathBuf) -> Self {
        Self {
            db_path: None,
            current_user_name: None,
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            path,
            db_override: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database file: `GATOR_DB_PATH`, then `db_path`, then `gator.db` next to the config
    pub fn db_path(&self) -> PathBuf {
        if let Some(path) = &self.db_override {
            return path.clone();
        }
        if let Some(path) = &self.db_path {
            return PathBuf::from(path);
        }
        self.path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_DB_FILE_NAME)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn set_user(&mut self, name: &str) -> GatorResult<()> {
        self.current_user_name = Some(name.to_string());
        self.save()
    }

    pub fn save(&self) -> GatorResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
