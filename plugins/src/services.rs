//! ServicesFactory implementation: builds the generator and tracker from config for the CLI and HTTP server.
use taskforge_core::api::{AppConfig, CliError, Services, ServicesFactory};

use crate::factory;

#[derive(Default)]
pub struct PluginServicesFactory;

impl ServicesFactory for PluginServicesFactory {
    fn build_services(&self, cfg: &AppConfig) -> Result<Services, CliError> {
        let generator = factory::build_generator(cfg)
            .map_err(|e| CliError::Config(format!("generator: {e}")))?;
        let tracker =
            factory::build_tracker(cfg).map_err(|e| CliError::Config(format!("tracker: {e}")))?;
        Ok(Services { generator, tracker })
    }
}
