use anyhow::Result;
use std::sync::Arc;

use taskforge_core::api::{AppConfig, IssueTracker, TaskGenerator};

use crate::generator::OpenAiGenerator;
use crate::tracker::LinearTracker;

pub fn build_generator(cfg: &AppConfig) -> Result<Option<Arc<dyn TaskGenerator>>> {
    let g = &cfg.generator;
    if !g.is_configured() {
        tracing::debug!(target: "taskforge.generator", enabled = g.enabled, "generator not configured");
        return Ok(None);
    }

    Ok(Some(Arc::new(OpenAiGenerator::new(
        g.base_url.clone(),
        g.api_key.clone(),
        g.model.clone(),
        g.temperature,
        g.timeout_ms,
    )?)))
}

pub fn build_tracker(cfg: &AppConfig) -> Result<Option<Arc<dyn IssueTracker>>> {
    let t = &cfg.tracker;
    if !t.is_configured() {
        tracing::debug!(target: "taskforge.tracker", enabled = t.enabled, "tracker not configured");
        return Ok(None);
    }

    Ok(Some(Arc::new(LinearTracker::new(
        t.base_url.clone(),
        t.api_key.clone(),
        t.timeout_ms,
    )?)))
}
