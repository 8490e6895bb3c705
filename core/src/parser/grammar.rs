//! Marker strings shared by the generation prompt and the parser.
//!
//! The prompt asks the model to emit exactly the canonical (first) entry of
//! every list below, and the parser splits on any entry. Changing a marker
//! means publishing a new grammar version, never editing `v1` in place.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GRAMMAR_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGrammar {
    pub version: String,
    /// Heading that opens every child task, matched at the start of a line.
    pub child_markers: Vec<String>,
    /// Heading that opens a parent group, matched at the start of a line.
    pub parent_markers: Vec<String>,
    /// Separator between the task number and its title on the heading line.
    pub title_separators: Vec<String>,
    pub description_labels: Vec<String>,
    pub criteria_labels: Vec<String>,
    pub priority_labels: Vec<String>,
    pub tags_labels: Vec<String>,
    pub project_labels: Vec<String>,
    /// Bold heading placed above the rendered criteria inside the description.
    pub criteria_heading: String,
    pub bullet: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl TaskGrammar {
    /// Spanish prompt format the service has always used.
    pub fn v1() -> Self {
        Self {
            version: DEFAULT_GRAMMAR_VERSION.to_string(),
            child_markers: strings(&["### Tarea", "### Task"]),
            parent_markers: strings(&["## Tarea Padre", "## Parent Task"]),
            title_separators: strings(&["–", "—", " - "]),
            description_labels: strings(&["Descripcion:", "Descripción:", "Description:"]),
            criteria_labels: strings(&["Criterios de aceptación:", "Acceptance Criteria:"]),
            priority_labels: strings(&["Priority:", "Prioridad:"]),
            tags_labels: strings(&["Tags:", "Etiquetas:"]),
            project_labels: strings(&["Proyecto:", "Project:"]),
            criteria_heading: "**Criterios de aceptación:**".to_string(),
            bullet: "•".to_string(),
        }
    }

    pub fn by_version(version: &str) -> Option<Self> {
        match version.trim() {
            "v1" | "" => Some(Self::v1()),
            _ => None,
        }
    }

    pub fn canonical_child_marker(&self) -> &str {
        canonical(&self.child_markers)
    }

    pub fn canonical_parent_marker(&self) -> &str {
        canonical(&self.parent_markers)
    }

    pub fn canonical_separator(&self) -> &str {
        canonical(&self.title_separators)
    }

    pub fn canonical_description_label(&self) -> &str {
        canonical(&self.description_labels)
    }

    pub fn canonical_criteria_label(&self) -> &str {
        canonical(&self.criteria_labels)
    }

    pub fn canonical_priority_label(&self) -> &str {
        canonical(&self.priority_labels)
    }

    pub fn canonical_tags_label(&self) -> &str {
        canonical(&self.tags_labels)
    }

    pub fn canonical_project_label(&self) -> &str {
        canonical(&self.project_labels)
    }
}

impl Default for TaskGrammar {
    fn default() -> Self {
        Self::v1()
    }
}

fn canonical(items: &[String]) -> &str {
    items.first().map(String::as_str).unwrap_or_default()
}
