//! HTTP路由handlers

use anyhow::Error;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use std::sync::Arc;
use taskforge_core::api::{
    interpret, submit_tasks, IssueDraft, IssueTracker, Priority, PromptOptions, SubmitTarget,
    TaskGenerator,
};
use taskforge_plugins::{ApiHttpError, ApiHttpErrorKind};

use crate::http::{
    models::*,
    state::AppState,
    validation::{validate_id, validate_name, validate_text},
};

/// 创建所有路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks/interpret", post(interpret_handler))
        .route("/api/tasks/parse", post(parse_handler))
        .route("/api/linear/teams", get(teams_handler))
        .route(
            "/api/linear/projects",
            get(projects_handler).post(create_project_handler),
        )
        .route("/api/linear/issues", post(create_issue_handler))
        .route("/api/linear/issues/batch", post(batch_issues_handler))
        .route("/health", get(health_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(state)
}

fn require_generator(state: &AppState) -> Result<Arc<dyn TaskGenerator>, HttpServerError> {
    state.services.generator.clone().ok_or_else(|| {
        HttpServerError::NotConfigured("OpenAI API key not configured".into())
    })
}

fn require_tracker(state: &AppState) -> Result<Arc<dyn IssueTracker>, HttpServerError> {
    state
        .services
        .tracker
        .clone()
        .ok_or_else(|| HttpServerError::NotConfigured("Linear API key not configured".into()))
}

/// POST /api/tasks/interpret - 生成结构化文本并解析
async fn interpret_handler(
    State(state): State<AppState>,
    Json(req): Json<InterpretRequest>,
) -> Result<Json<InterpretResponse>, HttpServerError> {
    state.record_request("/api/tasks/interpret");

    validate_text(&req.text)?;
    let generator = require_generator(&state)?;

    let out = interpret(
        generator.as_ref(),
        &state.parser,
        &req.text,
        PromptOptions {
            with_project: req.with_project,
        },
    )
    .await
    .map_err(|e| upstream_error(&state, "generate structured text", e))?;

    let warning = out.is_empty().then(|| {
        format!(
            "no '{}' sections found in the generated text",
            state.parser.format_identifier()
        )
    });

    Ok(Json(InterpretResponse {
        success: true,
        structured_text: out.structured_text,
        tasks: out.tasks,
        grammar_version: out.grammar_version,
        warning,
    }))
}

/// POST /api/tasks/parse - 仅解析，不调用生成服务
async fn parse_handler(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, HttpServerError> {
    state.record_request("/api/tasks/parse");

    validate_text(&req.text)?;

    let tasks = state.parser.parse(&req.text);
    let report = state.parser.inspect(&req.text);
    Ok(Json(ParseResponse {
        success: true,
        tasks,
        grammar_version: report.grammar_version.clone(),
        report: report.into(),
    }))
}

/// GET /api/linear/teams
async fn teams_handler(
    State(state): State<AppState>,
) -> Result<Json<TeamsResponse>, HttpServerError> {
    state.record_request("/api/linear/teams");

    let tracker = require_tracker(&state)?;
    let teams = tracker
        .list_teams()
        .await
        .map_err(|e| upstream_error(&state, "list teams", e))?;

    Ok(Json(TeamsResponse {
        success: true,
        teams,
    }))
}

/// GET /api/linear/projects?teamId=
async fn projects_handler(
    State(state): State<AppState>,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<ProjectsResponse>, HttpServerError> {
    state.record_request("/api/linear/projects");

    let team_id = query.team_id.unwrap_or_default();
    validate_id("teamId", &team_id)?;
    let tracker = require_tracker(&state)?;

    let projects = tracker
        .list_projects(&team_id)
        .await
        .map_err(|e| upstream_error(&state, "list projects", e))?;

    Ok(Json(ProjectsResponse {
        success: true,
        projects,
    }))
}

/// POST /api/linear/projects
async fn create_project_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<CreateProjectResponse>, HttpServerError> {
    state.record_request("/api/linear/projects#create");

    validate_name("name", &req.name)?;
    validate_id("teamId", &req.team_id)?;
    let tracker = require_tracker(&state)?;

    let project = tracker
        .create_project(req.name.trim(), &req.team_id)
        .await
        .map_err(|e| upstream_error(&state, "create project", e))?;

    Ok(Json(CreateProjectResponse {
        success: true,
        project,
    }))
}

/// POST /api/linear/issues - 创建单个 issue
async fn create_issue_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateIssueRequest>,
) -> Result<Json<CreateIssueResponse>, HttpServerError> {
    state.record_request("/api/linear/issues");

    validate_name("title", &req.title)?;
    validate_id("teamId", &req.team_id)?;
    let tracker = require_tracker(&state)?;

    let mut draft = IssueDraft::new(
        req.team_id,
        req.title.trim(),
        req.description.unwrap_or_default(),
        Priority::from_str_or_default(req.priority.as_deref()),
    );
    draft.project_id = req.project_id.filter(|p| !p.trim().is_empty());

    let issue = tracker
        .create_issue(draft)
        .await
        .map_err(|e| upstream_error(&state, "create issue", e))?;

    Ok(Json(CreateIssueResponse {
        success: true,
        issue,
    }))
}

/// POST /api/linear/issues/batch - 按顺序批量创建
async fn batch_issues_handler(
    State(state): State<AppState>,
    Json(req): Json<BatchIssuesRequest>,
) -> Result<Json<BatchIssuesResponse>, HttpServerError> {
    state.record_request("/api/linear/issues/batch");

    validate_id("teamId", &req.team_id)?;
    if let Some(project_id) = req.project_id.as_deref().filter(|p| !p.is_empty()) {
        validate_id("projectId", project_id)?;
    }
    if req.tasks.is_empty() {
        return Err(HttpServerError::InvalidRequest(
            "tasks cannot be empty".to_string(),
        ));
    }
    let tracker = require_tracker(&state)?;

    let submit_cfg = &state.config.submit;
    let target = SubmitTarget::team(req.team_id)
        .with_project(req.project_id)
        .resolving(
            req.resolve_projects.unwrap_or(submit_cfg.resolve_projects),
            submit_cfg.default_project.clone(),
        );
    let report = submit_tasks(tracker.as_ref(), &req.tasks, &target).await;

    if !report.failures.is_empty() {
        state.record_error();
    }

    Ok(Json(BatchIssuesResponse {
        success: report.failures.is_empty(),
        total: report.total,
        succeeded: report.succeeded(),
        created: report.created,
        failures: report.failures,
        projects_created: report.projects_created,
    }))
}

/// GET /health - 健康检查
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (uptime_seconds, requests_handled, errors_total) = state
        .stats
        .read()
        .map(|s| (s.uptime_seconds(), s.requests_total, s.errors_total))
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".into(),
        session_id: state.session_id.clone(),
        uptime_seconds,
        requests_handled,
        errors_total,
        generator_configured: state.services.generator.is_some(),
        tracker_configured: state.services.tracker.is_some(),
        timestamp: Local::now().to_rfc3339(),
    })
}

/// POST /api/shutdown - 触发优雅关闭
async fn shutdown_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let _ = state.shutdown_tx.send(());

    Json(serde_json::json!({
        "success": true,
        "message": "Shutdown signal sent"
    }))
}

fn upstream_error(state: &AppState, action: &str, err: Error) -> HttpServerError {
    state.record_error();

    let error_chain = format_error_chain(&err);
    let (error_class, error_status, error_url) = upstream_error_class(&err);
    tracing::warn!(
        target: "taskforge.http",
        action = action,
        error = %err,
        error_class = %error_class,
        error_status = ?error_status,
        error_url = ?error_url,
        error_chain = %error_chain,
        "Upstream call failed"
    );

    if error_class == ApiHttpErrorKind::Timeout.as_str() {
        return HttpServerError::Timeout;
    }
    HttpServerError::Upstream(format!("Failed to {action}: {err}"))
}

fn upstream_error_class(err: &Error) -> (String, Option<u16>, Option<String>) {
    for cause in err.chain() {
        if let Some(api_err) = cause.downcast_ref::<ApiHttpError>() {
            return (
                api_err.kind().to_string(),
                api_err.status(),
                api_err.url().map(|url| url.to_string()),
            );
        }
    }

    ("unknown".to_string(), None, None)
}

fn format_error_chain(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
