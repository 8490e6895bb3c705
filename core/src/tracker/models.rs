use serde::{Deserialize, Serialize};

use crate::task::{Priority, TaskRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Input for one issue creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDraft {
    pub team_id: String,
    pub title: String,
    pub description: String,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub label_ids: Vec<String>,
}

impl IssueDraft {
    pub fn new(
        team_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            title: title.into(),
            description: description.into(),
            priority: priority.tracker_value(),
            project_id: None,
            label_ids: Vec::new(),
        }
    }

    pub fn from_task(task: &TaskRecord, team_id: &str, project_id: Option<String>) -> Self {
        let mut draft = Self::new(team_id, &task.title, &task.description, task.priority);
        draft.project_id = project_id;
        draft
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub title: String,
    pub url: String,
}
