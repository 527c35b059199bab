use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "SymptomEngine";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum matches (and treatment rows) returned by the local matcher.
pub const DEFAULT_RESULT_LIMIT: usize = 8;

/// Syndromes kept by the predictor service per request.
pub const GUIDE_TOP_SYNDROMES: usize = 3;

pub const DEFAULT_PREDICTOR_URL: &str = "http://localhost:5000";
pub const DEFAULT_PREDICTOR_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

const ENV_PREFIX: &str = "SYMPTOM_ENGINE_";

pub fn default_log_filter() -> &'static str {
    "symptom_engine=info"
}

/// Get the application data directory (~/SymptomEngine/).
/// Falls back to the working directory when no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn default_knowledge_base_path() -> PathBuf {
    app_data_dir().join("knowledge_base.json")
}

pub fn default_guide_path() -> PathBuf {
    app_data_dir().join("symptom_guide.json")
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Engine behaviour knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Reject symptoms outside the vocabulary.
    pub closed_vocabulary: bool,
    pub result_limit: usize,
    pub predictor_url: String,
    pub predictor_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            closed_vocabulary: false,
            result_limit: DEFAULT_RESULT_LIMIT,
            predictor_url: DEFAULT_PREDICTOR_URL.to_string(),
            predictor_timeout: Duration::from_secs(DEFAULT_PREDICTOR_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(&env_key("CLOSED_VOCABULARY")) {
            config.closed_vocabulary = parse_bool("CLOSED_VOCABULARY", &v)?;
        }
        if let Some(v) = lookup(&env_key("RESULT_LIMIT")) {
            config.result_limit = parse_num("RESULT_LIMIT", &v)?;
        }
        if let Some(v) = lookup(&env_key("PREDICTOR_URL")) {
            config.predictor_url = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup(&env_key("PREDICTOR_TIMEOUT_SECS")) {
            config.predictor_timeout = Duration::from_secs(parse_num("PREDICTOR_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup(&env_key("CONNECT_TIMEOUT_SECS")) {
            config.connect_timeout = Duration::from_secs(parse_num("CONNECT_TIMEOUT_SECS", &v)?);
        }
        Ok(config)
    }
}

/// Settings for the predictor service binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub knowledge_base_path: PathBuf,
    pub guide_path: PathBuf,
    pub engine: EngineConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup(&env_key("BIND_ADDR")).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: env_key("BIND_ADDR"),
            value: bind.clone(),
        })?;

        Ok(Self {
            bind_addr,
            knowledge_base_path: lookup(&env_key("KNOWLEDGE_BASE"))
                .map(PathBuf::from)
                .unwrap_or_else(default_knowledge_base_path),
            guide_path: lookup(&env_key("GUIDE"))
                .map(PathBuf::from)
                .unwrap_or_else(default_guide_path),
            engine: EngineConfig::from_lookup(&lookup)?,
        })
    }
}

fn env_key(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: env_key(name),
            value: value.to_string(),
        }),
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: env_key(name),
        value: value.to_string(),
    })
}
