use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use config::{
    builder::DefaultState, Config as ConfigLib, ConfigBuilder, ConfigError, Environment, File,
    FileFormat,
};
use crate::utils::error::{Result, ServiceError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub comparator: ComparatorConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Supabase,
    Filesystem,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    pub key: Option<String>,
    pub bucket: String,
    pub root: Option<PathBuf>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparatorConfig {
    pub python: String,
    pub script_path: Option<PathBuf>,
    pub model: String,
    pub detector_backend: String,
    pub distance_metric: String,
    pub enforce_detection: bool,
    pub timeout_secs: u64,
}

impl StorageConfig {
    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ComparatorConfig {
    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScratchConfig {
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `config/default`, `config/local`, `APP__*`
    /// variables and the conventional `PORT` / `SUPABASE_*` variables.
    pub fn new() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. APP__SERVER__PORT=8080
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("storage.url", std::env::var("SUPABASE_URL").ok())?
            .set_override_option("storage.key", std::env::var("SUPABASE_KEY").ok())?;

        Self::from_builder(builder)
    }

    /// Builds a configuration from defaults overlaid with a TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(source, FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn defaults() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigLib::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.max_payload_bytes", 16_777_216)? // 16MB
            .set_default("logging.level", "info")?
            .set_default("logging.file_prefix", "face-verifier.log")?
            .set_default("storage.backend", "supabase")?
            .set_default("storage.bucket", "images")?
            .set_default("storage.timeout_secs", 30)?
            .set_default("comparator.python", "python3")?
            .set_default("comparator.model", "VGG-Face")?
            .set_default("comparator.detector_backend", "opencv")?
            .set_default("comparator.distance_metric", "cosine")?
            .set_default("comparator.enforce_detection", true)?
            .set_default("comparator.timeout_secs", 120)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServiceError::Config("Invalid port number".into()));
        }
        if self.server.max_payload_bytes == 0 {
            return Err(ServiceError::Config("max_payload_bytes must be greater than 0".into()));
        }

        if self.storage.bucket.trim().is_empty() {
            return Err(ServiceError::Config("storage bucket must be set".into()));
        }
        if self.storage.timeout_secs == 0 {
            return Err(ServiceError::Config("storage timeout_secs must be greater than 0".into()));
        }
        match self.storage.backend {
            StorageBackend::Supabase => {
                if is_blank(&self.storage.url) || is_blank(&self.storage.key) {
                    return Err(ServiceError::Config(
                        "Supabase storage requires url and key (SUPABASE_URL / SUPABASE_KEY)".into(),
                    ));
                }
            }
            StorageBackend::Filesystem => {
                if self.storage.root.is_none() {
                    return Err(ServiceError::Config("filesystem storage requires a root directory".into()));
                }
            }
        }

        if self.comparator.python.trim().is_empty() {
            return Err(ServiceError::Config("comparator python interpreter must be set".into()));
        }
        if self.comparator.timeout_secs == 0 {
            return Err(ServiceError::Config("comparator timeout_secs must be greater than 0".into()));
        }

        Ok(())
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch
            .directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl From<ConfigError> for ServiceError {
    fn from(error: ConfigError) -> Self {
        ServiceError::Config(error.to_string())
    }
}
