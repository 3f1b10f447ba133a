use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "ecc";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the codebook pages are served on
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Default log level, overridable through `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files (logs to stdout only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_listen_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        self.log_level
            .parse()
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the ecc directory (~/.ecc)
    pub ecc_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the ecc directory path (custom or default ~/.ecc)
    pub fn ecc_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new ecc state directory
    ///
    /// With `force` an existing directory, database included, is removed first.
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
        force: bool,
    ) -> Result<Self, StateError> {
        let ecc_dir = Self::ecc_dir(custom_path)?;

        if ecc_dir.exists() && !force {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        config.log_level()?;

        if ecc_dir.exists() {
            fs::remove_dir_all(&ecc_dir)?;
        }
        fs::create_dir_all(&ecc_dir)?;
        let config_path = ecc_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // the schema is created by the service on first connect
        let db_path = ecc_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            ecc_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the ecc directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let ecc_dir = Self::ecc_dir(custom_path)?;

        if !ecc_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = ecc_dir.join(DB_FILE_NAME);
        let config_path = ecc_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            ecc_dir,
            db_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("ecc directory not initialized. Run 'ecc init' first")]
    NotInitialized,

    #[error("ecc directory already initialized (use --force to start over)")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
