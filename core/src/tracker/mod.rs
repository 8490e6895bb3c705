pub mod models;
pub mod r#trait;

pub use models::{CreatedIssue, IssueDraft, Project, Team};
pub use r#trait::IssueTracker;
