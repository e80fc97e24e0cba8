use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default base URL of the hosted TextRazor API.
pub const DEFAULT_TEXTRAZOR_URL: &str = "https://api.textrazor.com";
/// Extractors requested when `TEXTRAZOR_EXTRACTORS` is not provided.
pub const DEFAULT_EXTRACTORS: [&str; 2] = ["entities", "categories"];
const DEFAULT_ANNOTATION_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Filezer server and CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Connection settings for the annotation service.
    pub annotation: AnnotationConfig,
    /// Directory receiving transient report artifacts; the OS temp dir when unset.
    pub report_dir: Option<PathBuf>,
    /// Maximum accepted upload body size in bytes.
    pub max_upload_bytes: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Settings consumed by the annotation client.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationConfig {
    /// API key sent with every annotation request.
    pub api_key: String,
    /// Base URL of the annotation service.
    pub base_url: String,
    /// Extractors requested from the service (`entities`, `categories`).
    pub extractors: Vec<String>,
    /// Optional classifier list; categories are only produced when one is named.
    pub classifiers: Option<String>,
    /// Upper bound for a single annotation call, in seconds.
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            annotation: AnnotationConfig::from_env()?,
            report_dir: load_env_optional("REPORT_DIR").map(PathBuf::from),
            max_upload_bytes: parse_optional("MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            server_port: parse_optional("SERVER_PORT")?,
        })
    }

    /// Configuration for runs that never contact the annotation service.
    pub fn offline() -> Self {
        Self {
            annotation: AnnotationConfig {
                api_key: String::new(),
                base_url: DEFAULT_TEXTRAZOR_URL.to_string(),
                extractors: default_extractors(),
                classifiers: None,
                timeout_secs: DEFAULT_ANNOTATION_TIMEOUT_SECS,
            },
            report_dir: load_env_optional("REPORT_DIR").map(PathBuf::from),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            server_port: None,
        }
    }
}

impl AnnotationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let extractors = load_env_optional("TEXTRAZOR_EXTRACTORS")
            .map(|value| parse_list(&value))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(default_extractors);

        Ok(Self {
            api_key: load_env_optional("TEXTRAZOR_API_KEY")
                .ok_or_else(|| ConfigError::MissingVariable("TEXTRAZOR_API_KEY".to_string()))?,
            base_url: load_env_optional("TEXTRAZOR_URL")
                .unwrap_or_else(|| DEFAULT_TEXTRAZOR_URL.to_string()),
            extractors,
            classifiers: load_env_optional("TEXTRAZOR_CLASSIFIERS"),
            timeout_secs: parse_optional("ANNOTATION_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_ANNOTATION_TIMEOUT_SECS),
        })
    }
}

fn default_extractors() -> Vec<String> {
    DEFAULT_EXTRACTORS.iter().map(|name| name.to_string()).collect()
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> &'static Config {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        annotation_url = %config.annotation.base_url,
        extractors = ?config.annotation.extractors,
        timeout_secs = config.annotation.timeout_secs,
        report_dir = ?config.report_dir,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.get_or_init(|| config)
}
