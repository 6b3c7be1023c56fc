use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Search engine connection configuration
    pub engine: EngineConfig,

    /// Index and relevance configuration
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from embedded defaults, optional file and
    /// environment. Constructed once at startup and passed by parameter
    /// into the components that need it.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: POST_SEARCH)
            .add_source(
                config::Environment::with_prefix("POST_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

/// Connection settings for the search engine. Host and credentials are each
/// independently overridable; the defaults target a local development
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine base URL
    #[serde(default = "default_engine_host")]
    pub host: String,

    /// Basic-auth username
    #[serde(default = "default_engine_username")]
    pub username: String,

    /// Basic-auth password
    #[serde(default = "default_engine_password")]
    pub password: String,

    /// Per-call timeout (seconds)
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// Max retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Linear retry backoff (seconds)
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Index name (singular, no versioning suffix; recreation replaces it)
    #[serde(default = "default_index")]
    pub index: String,

    /// Search-time synonym groups, one comma-joined equivalence set per
    /// entry. Changing them requires an index recreation to take effect.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_engine_host() -> String {
    "http://localhost:9200".to_string()
}

fn default_engine_username() -> String {
    "elastic".to_string()
}

fn default_engine_password() -> String {
    "elastic".to_string()
}

fn default_engine_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    2
}

fn default_index() -> String {
    "posts".to_string()
}
