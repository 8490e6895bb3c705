mod load;
mod types;

pub use load::{
    apply_env_overrides, get_taskforge_data_dir, load, load_default, load_from, ConfigError,
};
pub use types::{
    AppConfig, GeneratorConfig, HttpServerConfig, LoggingConfig, SubmitConfig, TrackerConfig,
};
