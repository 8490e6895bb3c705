//! HTTP服务器生命周期管理

use super::{
    middleware::{create_middleware_stack, request_logger},
    routes::create_router,
    AppState,
};
use crate::commands::cli::ServeArgs;
use axum::middleware;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use taskforge_core::api::{AppContext, CliError};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

const STATE_FILE_NAME: &str = "taskforge.state";

/// HTTP服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

/// 获取服务器状态文件目录
fn get_servers_dir() -> Result<PathBuf, CliError> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Command("Cannot find home directory".to_string()))?;
    let servers_dir = home.join(".taskforge").join("servers");
    fs::create_dir_all(&servers_dir)
        .map_err(|e| CliError::Command(format!("Failed to create servers directory: {e}")))?;
    Ok(servers_dir)
}

/// 写入服务器状态文件
fn write_state_file(session_id: &str, port: u16, host: &str) -> Result<PathBuf, CliError> {
    let state_file = get_servers_dir()?.join(STATE_FILE_NAME);

    let state = serde_json::json!({
        "session_id": session_id,
        "port": port,
        "pid": std::process::id(),
        "url": format!("http://{}:{}", host, port),
        "started_at": chrono::Local::now().to_rfc3339()
    });
    let body = serde_json::to_string_pretty(&state).map_err(|e| CliError::Anyhow(e.into()))?;

    fs::write(&state_file, body)
        .map_err(|e| CliError::Command(format!("Failed to write state file: {e}")))?;

    info!("State file written to: {}", state_file.display());
    Ok(state_file)
}

fn remove_state_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove state file: {}", e);
    } else {
        info!("State file removed: {}", path.display());
    }
}

/// 处理 serve 命令
pub async fn handle_serve(args: ServeArgs, ctx: &AppContext) -> Result<i32, CliError> {
    let session_id = args
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // CLI 参数优先，配置文件作为默认值
    let http_cfg = &ctx.cfg().http_server;
    let config = ServerConfig {
        host: args.host.unwrap_or_else(|| http_cfg.host.clone()),
        port: args.port.unwrap_or(http_cfg.port),
        request_timeout_secs: http_cfg.request_timeout_secs,
    };

    let services = ctx.build_services()?;
    if services.generator.is_none() {
        warn!("OpenAI API key not configured; /api/tasks/interpret will return NOT_CONFIGURED");
    }
    if services.tracker.is_none() {
        warn!("Linear API key not configured; /api/linear/* will return NOT_CONFIGURED");
    }

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = AppState::new(
        session_id.clone(),
        ctx.parser(),
        services,
        ctx.cfg().clone(),
        shutdown_tx,
    );

    let state_file = write_state_file(&session_id, config.port, &config.host)?;

    let result = start_server_with_config(session_id, config, state).await;
    remove_state_file(&state_file);

    result.map_err(|e| CliError::Command(e.to_string()))?;
    Ok(0)
}

/// 使用自定义配置启动HTTP服务器
pub async fn start_server_with_config(
    session_id: String,
    config: ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(
        "Starting HTTP server on {}:{} (session: {})",
        config.host, config.port, session_id
    );

    let app = create_router(state.clone())
        .layer(middleware::from_fn(request_logger))
        .layer(create_middleware_stack(config.request_timeout_secs));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);

    let mut shutdown_rx = state.shutdown_tx.subscribe();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C signal");
                }
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown signal from API");
                }
                _ = wait_for_sigterm() => {
                    info!("Received SIGTERM signal");
                }
            }

            info!("Starting graceful shutdown...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// 等待 SIGTERM 信号（Unix系统）
#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to setup SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Windows 系统不支持 SIGTERM，永久等待
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
