//! HTTP API数据模型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskforge_core::api::{
    CreatedIssue, FormatReport, Project, SubmissionFailure, TaskRecord, Team,
};

// ============= Tasks =============

#[derive(Debug, Deserialize)]
pub struct InterpretRequest {
    #[serde(default, alias = "texto")]
    pub text: String,
    #[serde(default)]
    pub with_project: bool,
}

#[derive(Debug, Serialize)]
pub struct InterpretResponse {
    pub success: bool,
    pub structured_text: String,
    pub tasks: Vec<TaskRecord>,
    pub grammar_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(default, alias = "texto")]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub segments: usize,
    pub parsed: usize,
    pub dropped: Vec<usize>,
}

impl From<FormatReport> for ParseReport {
    fn from(r: FormatReport) -> Self {
        Self {
            segments: r.segments,
            parsed: r.parsed,
            dropped: r.dropped,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub tasks: Vec<TaskRecord>,
    pub grammar_version: String,
    pub report: ParseReport,
}

// ============= Linear =============

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub success: bool,
    pub teams: Vec<Team>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsQuery {
    #[serde(default)]
    pub team_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub success: bool,
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub team_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub success: bool,
    pub project: Project,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// urgent | high | medium | low; anything else maps to medium.
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateIssueResponse {
    pub success: bool,
    pub issue: CreatedIssue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchIssuesRequest {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub resolve_projects: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct BatchIssuesResponse {
    pub success: bool,
    pub total: usize,
    pub succeeded: usize,
    pub created: Vec<CreatedIssue>,
    pub failures: Vec<SubmissionFailure>,
    pub projects_created: usize,
}

// ============= Health =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub session_id: String,
    pub uptime_seconds: f64,
    pub requests_handled: u64,
    pub errors_total: u64,
    pub generator_configured: bool,
    pub tracker_configured: bool,
    pub timestamp: String,
}

// ============= Error Handling =============

#[derive(Debug)]
pub enum HttpServerError {
    InvalidRequest(String),
    NotConfigured(String),
    Upstream(String),
    Timeout,
    Internal(String),
}

impl HttpServerError {
    pub fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            Self::NotConfigured(_) => (StatusCode::INTERNAL_SERVER_ERROR, "NOT_CONFIGURED"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Timeout => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.parts();
        let message = match self {
            Self::InvalidRequest(msg)
            | Self::NotConfigured(msg)
            | Self::Upstream(msg)
            | Self::Internal(msg) => msg,
            Self::Timeout => "Request timeout".to_string(),
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
            "error_code": error_code,
        });

        (status, Json(body)).into_response()
    }
}
