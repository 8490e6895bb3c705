use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub http_server: HttpServerConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub submit: SubmitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_true")]
    pub console: bool,

    /// If true, log to a file under `directory`.
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "taskforge.http=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Log file directory. Filled with `~/.taskforge/logs` by `load_default` when unset.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            console: true,
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Per-request timeout applied by the server middleware.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_generator_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_generator_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_generator_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_generator_timeout_ms() -> u64 {
    60_000
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_generator_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_ms: default_generator_timeout_ms(),
        }
    }
}

impl GeneratorConfig {
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_tracker_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_tracker_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_tracker_base_url() -> String {
    "https://api.linear.app/graphql".to_string()
}

fn default_tracker_timeout_ms() -> u64 {
    30_000
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_tracker_base_url(),
            api_key: String::new(),
            timeout_ms: default_tracker_timeout_ms(),
        }
    }
}

impl TrackerConfig {
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    #[serde(default)]
    pub resolve_projects: bool,

    #[serde(default = "default_project")]
    pub default_project: String,
}

fn default_project() -> String {
    crate::submit::DEFAULT_PROJECT_NAME.to_string()
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            resolve_projects: false,
            default_project: default_project(),
        }
    }
}
