use std::collections::HashMap;

use crate::tracker::IssueTracker;

/// Maps project names to ids for one team, creating missing projects on
/// first use and caching them for the rest of the run.
pub struct ProjectResolver<'a> {
    tracker: &'a dyn IssueTracker,
    team_id: String,
    known: Option<HashMap<String, String>>,
    created: HashMap<String, String>,
}

impl<'a> ProjectResolver<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, team_id: impl Into<String>) -> Self {
        Self {
            tracker,
            team_id: team_id.into(),
            known: None,
            created: HashMap::new(),
        }
    }

    async fn load_known(&mut self) -> &HashMap<String, String> {
        if self.known.is_none() {
            let map = match self.tracker.list_projects(&self.team_id).await {
                Ok(projects) => {
                    tracing::info!(
                        target: "taskforge.submit",
                        team_id = %self.team_id,
                        projects = projects.len(),
                        "loaded existing projects"
                    );
                    projects.into_iter().map(|p| (p.name, p.id)).collect()
                }
                Err(e) => {
                    tracing::warn!(
                        target: "taskforge.submit",
                        team_id = %self.team_id,
                        error = %e,
                        "failed to list projects, continuing without them"
                    );
                    HashMap::new()
                }
            };
            self.known = Some(map);
        }
        self.known.get_or_insert_with(HashMap::new)
    }

    /// Id of the project called `name`, or `None` when it could not be
    /// found nor created.
    pub async fn resolve(&mut self, name: &str) -> Option<String> {
        if let Some(id) = self.load_known().await.get(name) {
            return Some(id.clone());
        }
        if let Some(id) = self.created.get(name) {
            return Some(id.clone());
        }

        tracing::info!(target: "taskforge.submit", project = %name, "creating project");
        match self.tracker.create_project(name, &self.team_id).await {
            Ok(project) => {
                self.created.insert(name.to_string(), project.id.clone());
                Some(project.id)
            }
            Err(e) => {
                tracing::warn!(
                    target: "taskforge.submit",
                    project = %name,
                    error = %e,
                    "failed to create project"
                );
                None
            }
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}
