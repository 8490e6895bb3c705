//! HTTP服务器模块 - 暴露任务解析与 Linear 提交 API

pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;
pub mod validation;

pub use models::*;
pub use server::*;
pub use state::*;
