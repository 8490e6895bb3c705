use crate::config::AppConfig;
use crate::error::CliError;
use crate::generator::TaskGenerator;
use crate::parser::TaskParser;
use crate::tracker::IssueTracker;
use std::sync::Arc;

/// External collaborators; `None` when the service is disabled or has no key.
#[derive(Clone, Default)]
pub struct Services {
    pub generator: Option<Arc<dyn TaskGenerator>>,
    pub tracker: Option<Arc<dyn IssueTracker>>,
}

impl Services {
    pub fn require_generator(&self) -> Result<Arc<dyn TaskGenerator>, CliError> {
        self.generator
            .clone()
            .ok_or_else(|| CliError::not_configured("generator", "OPENAI_API_KEY"))
    }

    pub fn require_tracker(&self) -> Result<Arc<dyn IssueTracker>, CliError> {
        self.tracker
            .clone()
            .ok_or_else(|| CliError::not_configured("tracker", "LINEAR_API_KEY"))
    }
}

pub trait ServicesFactory: Send + Sync {
    fn build_services(&self, cfg: &AppConfig) -> Result<Services, CliError>;
}

#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    parser: Arc<TaskParser>,
    services_factory: Option<Arc<dyn ServicesFactory>>,
}

impl AppContext {
    pub fn new(cfg: AppConfig, services_factory: Option<Arc<dyn ServicesFactory>>) -> Self {
        Self {
            cfg,
            parser: Arc::new(TaskParser::default()),
            services_factory,
        }
    }

    pub fn with_parser(mut self, parser: TaskParser) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn parser(&self) -> Arc<TaskParser> {
        self.parser.clone()
    }

    pub fn build_services(&self) -> Result<Services, CliError> {
        let Some(factory) = self.services_factory.as_ref() else {
            return Err(CliError::Config(
                "services_factory missing (cannot build plugins/services)".into(),
            ));
        };
        factory.build_services(&self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyFactory;

    impl ServicesFactory for EmptyFactory {
        fn build_services(&self, _cfg: &AppConfig) -> Result<Services, CliError> {
            Ok(Services::default())
        }
    }

    #[test]
    fn missing_factory_is_a_config_error() {
        let ctx = AppContext::new(AppConfig::default(), None);
        assert!(matches!(ctx.build_services(), Err(CliError::Config(_))));
    }

    #[test]
    fn unconfigured_services_are_reported_by_name() {
        let ctx = AppContext::new(AppConfig::default(), Some(Arc::new(EmptyFactory)));
        let services = ctx.build_services().unwrap();
        let err = services.require_tracker().err().unwrap();
        assert!(err.to_string().contains("LINEAR_API_KEY"));
        assert!(services.require_generator().is_err());
        assert_eq!(ctx.parser().grammar().version, "v1");
    }
}
