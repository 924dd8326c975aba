use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `EMAIL_TEMPLATES_STORAGE__BACKEND=memory`
const ENV_PREFIX: &str = "EMAIL_TEMPLATES";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backend type: "file" or "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Directory holding persisted values (file backend only)
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Key under which the template collection is stored
    #[serde(default = "default_storage_key")]
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

fn default_storage_backend() -> String {
    "file".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_storage_key() -> String {
    "emailTemplates".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // EMAIL_TEMPLATES_STORAGE__PATH, EMAIL_TEMPLATES_LOGGING__LEVEL, etc.
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load settings from a single file layered over the built-in defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("storage.backend", default_storage_backend())?
            .set_default("storage.path", "data")?
            .set_default("storage.key", default_storage_key())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.json", false)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
