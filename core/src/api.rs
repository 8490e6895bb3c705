//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `taskforge_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load, load_default, AppConfig, ConfigError, GeneratorConfig, HttpServerConfig,
    LoggingConfig, SubmitConfig, TrackerConfig,
};
pub use crate::context::{AppContext, Services, ServicesFactory};
pub use crate::error::CliError;
pub use crate::generator::TaskGenerator;
pub use crate::parser::{parse, FormatReport, TaskGrammar, TaskParser, DEFAULT_GRAMMAR_VERSION};
pub use crate::pipeline::{interpret, Interpretation};
pub use crate::prompt::{render_prompt, PromptOptions};
pub use crate::submit::{
    submit_tasks, submit_tasks_with_progress, SubmissionFailure, SubmissionReport,
    SubmitProgress, SubmitTarget, DEFAULT_PROJECT_NAME,
};
pub use crate::task::{Priority, TaskRecord, TITLE_MAX_CHARS};
pub use crate::tracker::{CreatedIssue, IssueDraft, IssueTracker, Project, Team};
