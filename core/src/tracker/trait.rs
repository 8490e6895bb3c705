use async_trait::async_trait;

use super::models::{CreatedIssue, IssueDraft, Project, Team};

/// Project-tracking service that receives the parsed tasks.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    fn name(&self) -> &str;
    async fn list_teams(&self) -> anyhow::Result<Vec<Team>>;
    async fn list_projects(&self, team_id: &str) -> anyhow::Result<Vec<Project>>;
    async fn create_project(&self, name: &str, team_id: &str) -> anyhow::Result<Project>;
    async fn create_issue(&self, draft: IssueDraft) -> anyhow::Result<CreatedIssue>;
}
