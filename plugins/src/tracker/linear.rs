use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use taskforge_core::api::{CreatedIssue, IssueDraft, IssueTracker, Project, Team};

use super::queries;
use crate::http_error::{parse_json_response, ApiHttpError};

const SERVICE: &str = "linear";

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TeamsData {
    teams: Connection<Team>,
}

#[derive(Debug, Deserialize)]
struct TeamProjectsData {
    team: Option<TeamProjects>,
}

#[derive(Debug, Deserialize)]
struct TeamProjects {
    projects: Connection<Project>,
}

#[derive(Debug, Deserialize)]
struct ProjectCreateData {
    #[serde(rename = "projectCreate")]
    project_create: ProjectPayload,
}

#[derive(Debug, Deserialize)]
struct ProjectPayload {
    success: bool,
    project: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct IssueCreateData {
    #[serde(rename = "issueCreate")]
    issue_create: IssuePayload,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    success: bool,
    issue: Option<CreatedIssue>,
}

/// Linear GraphQL client. The API key goes into `Authorization` as is,
/// without a `Bearer` prefix.
#[derive(Clone)]
pub struct LinearTracker {
    api_key: String,
    http: reqwest::Client,
    url: String,
}

impl LinearTracker {
    pub fn new(base_url: String, api_key: String, timeout_ms: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            api_key,
            http,
            url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Runs one operation and returns its `data` object.
    async fn graphql(&self, operation: &'static str, query: &str, variables: Value) -> Result<Value> {
        let url = &self.url;
        tracing::debug!(
            target: "taskforge.tracker",
            stage = "tracker.linear.in",
            operation = operation,
            url = %url
        );
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|err| ApiHttpError::from_reqwest(SERVICE, err, url.clone()))?;
        let status = resp.status();
        let mut raw = parse_json_response(SERVICE, resp).await?;

        if let Some(first) = raw
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
        {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown GraphQL error")
                .to_string();
            tracing::warn!(
                target: "taskforge.tracker",
                operation = operation,
                error = %message,
                "graphql error"
            );
            return Err(ApiHttpError::graphql_error(SERVICE, url, message).into());
        }

        let data = raw.get_mut("data").map(Value::take).unwrap_or(Value::Null);
        if data.is_null() {
            return Err(ApiHttpError::shape_error(SERVICE, url, "response has no data").into());
        }
        tracing::debug!(
            target: "taskforge.tracker",
            stage = "tracker.linear.out",
            operation = operation,
            status = %status
        );
        Ok(data)
    }

    fn decode<T: DeserializeOwned>(&self, operation: &str, data: Value) -> Result<T> {
        serde_json::from_value(data).map_err(|e| {
            ApiHttpError::shape_error(
                SERVICE,
                &self.url,
                format!("unexpected {operation} response: {e}"),
            )
            .into()
        })
    }
}

#[async_trait]
impl IssueTracker for LinearTracker {
    fn name(&self) -> &str {
        "linear"
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let data = self.graphql("teams", queries::TEAMS, json!({})).await?;
        let out: TeamsData = self.decode("teams", data)?;
        Ok(out.teams.nodes)
    }

    async fn list_projects(&self, team_id: &str) -> Result<Vec<Project>> {
        let data = self
            .graphql(
                "team_projects",
                queries::TEAM_PROJECTS,
                json!({ "teamId": team_id }),
            )
            .await?;
        let out: TeamProjectsData = self.decode("team_projects", data)?;
        match out.team {
            Some(team) => Ok(team.projects.nodes),
            None => Err(ApiHttpError::graphql_error(
                SERVICE,
                &self.url,
                format!("team {team_id} not found"),
            )
            .into()),
        }
    }

    async fn create_project(&self, name: &str, team_id: &str) -> Result<Project> {
        let input = json!({ "name": name, "teamIds": [team_id] });
        let data = self
            .graphql(
                "project_create",
                queries::PROJECT_CREATE,
                json!({ "input": input }),
            )
            .await?;
        let out: ProjectCreateData = self.decode("project_create", data)?;
        match out.project_create {
            ProjectPayload {
                success: true,
                project: Some(project),
            } => {
                tracing::info!(
                    target: "taskforge.tracker",
                    project_id = %project.id,
                    name = %project.name,
                    "project created"
                );
                Ok(project)
            }
            _ => Err(ApiHttpError::graphql_error(
                SERVICE,
                &self.url,
                "project was not created".to_string(),
            )
            .into()),
        }
    }

    async fn create_issue(&self, draft: IssueDraft) -> Result<CreatedIssue> {
        let data = self
            .graphql(
                "issue_create",
                queries::ISSUE_CREATE,
                json!({ "input": draft }),
            )
            .await?;
        let out: IssueCreateData = self.decode("issue_create", data)?;
        match out.issue_create {
            IssuePayload {
                success: true,
                issue: Some(issue),
            } => Ok(issue),
            _ => Err(ApiHttpError::graphql_error(
                SERVICE,
                &self.url,
                "issue was not created".to_string(),
            )
            .into()),
        }
    }
}
