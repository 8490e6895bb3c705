use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::AppConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    HomeDir,
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Get the default taskforge data directory: ~/.taskforge
pub fn get_taskforge_data_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::HomeDir)?;
    Ok(PathBuf::from(home).join(".taskforge"))
}

pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `explicit` when given, otherwise falls back to [`load_default`].
/// Environment overrides are applied either way.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => {
            let mut cfg = load_from(path)?;
            apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
            Ok(cfg)
        }
        None => load_default(),
    }
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    // Priority 1: ~/.taskforge/config.toml
    let data_dir = get_taskforge_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from(&user_config)?
    } else if local_config.exists() {
        load_from(local_config)?
    } else {
        AppConfig::default()
    };

    // Log files default to ~/.taskforge/logs
    let dir_unset = cfg
        .logging
        .directory
        .as_ref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true);
    if cfg.logging.file && dir_unset {
        let logs_dir = data_dir.join("logs");
        std::fs::create_dir_all(&logs_dir).map_err(|source| ConfigError::CreateDir {
            path: logs_dir.clone(),
            source,
        })?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    Ok(cfg)
}

/// Environment variable overrides (highest priority). Blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("OPENAI_API_KEY") {
        cfg.generator.api_key = v;
    }
    if let Some(v) = get("TASKFORGE_OPENAI_BASE_URL") {
        cfg.generator.base_url = v;
    }
    if let Some(v) = get("TASKFORGE_MODEL") {
        cfg.generator.model = v;
    }
    if let Some(v) = get("LINEAR_API_KEY") {
        cfg.tracker.api_key = v;
    }
    if let Some(v) = get("TASKFORGE_LINEAR_URL") {
        cfg.tracker.base_url = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_sections_take_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http_server]\nport = 8080\n").unwrap();

        let cfg = load_from(file.path()).unwrap();
        assert_eq!(cfg.http_server.port, 8080);
        assert_eq!(cfg.http_server.host, "127.0.0.1");
        assert_eq!(cfg.generator.model, "gpt-4o-mini");
        assert!((cfg.generator.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(cfg.tracker.base_url, "https://api.linear.app/graphql");
        assert_eq!(cfg.submit.default_project, "General");
        assert!(!cfg.generator.is_configured());
        assert!(!cfg.tracker.is_configured());
    }

    #[test]
    fn full_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[logging]
level = "debug"
file = true
directory = "/tmp/tf-logs"

[generator]
api_key = "sk-test"
model = "gpt-4o"
temperature = 0.7

[tracker]
api_key = "lin_api_x"
enabled = false

[submit]
resolve_projects = true
default_project = "Inbox"
"#
        )
        .unwrap();

        let cfg = load_from(file.path()).unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.directory.as_deref(), Some("/tmp/tf-logs"));
        assert!(cfg.generator.is_configured());
        assert_eq!(cfg.generator.model, "gpt-4o");
        assert!(!cfg.tracker.is_configured());
        assert!(cfg.submit.resolve_projects);
        assert_eq!(cfg.submit.default_project, "Inbox");
    }

    #[test]
    fn invalid_toml_reports_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http_server\nport = ").unwrap();
        let err = load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn env_overrides_replace_non_blank_values() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-env"),
            ("TASKFORGE_MODEL", "  "),
            ("LINEAR_API_KEY", "lin-env"),
            ("TASKFORGE_LINEAR_URL", "http://127.0.0.1:9/graphql"),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.generator.api_key, "sk-env");
        assert_eq!(cfg.generator.model, "gpt-4o-mini");
        assert_eq!(cfg.tracker.api_key, "lin-env");
        assert_eq!(cfg.tracker.base_url, "http://127.0.0.1:9/graphql");
        assert_eq!(cfg.generator.base_url, "https://api.openai.com/v1");
    }
}
