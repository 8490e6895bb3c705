use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("{service} request failed: {source}")]
    Upstream {
        service: &'static str,
        source: anyhow::Error,
    },
    #[error("no tasks found in the structured text")]
    NothingParsed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl CliError {
    pub fn upstream(service: &'static str, source: anyhow::Error) -> Self {
        CliError::Upstream { service, source }
    }

    pub fn not_configured(service: &str, key_env: &str) -> Self {
        CliError::Config(format!(
            "{service} is not configured (set {key_env} or the api_key in config.toml)"
        ))
    }

    /// 0: success
    /// 3: nothing parsed
    /// 11: config error
    /// 20: command / IO error
    /// 30: upstream service error
    /// 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 11,
            CliError::Command(_) | CliError::Io(_) => 20,
            CliError::Upstream { .. } => 30,
            CliError::NothingParsed => 3,
            CliError::Anyhow(_) => 50,
        }
    }
}
