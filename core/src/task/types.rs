use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum title length accepted by the tracker, counted in characters.
pub const TITLE_MAX_CHARS: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Numeric scale used by the tracker: low=1 .. urgent=4.
    pub fn tracker_value(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    /// Lenient lookup used by the HTTP layer; anything unknown becomes `Medium`.
    pub fn from_str_or_default(s: Option<&str>) -> Self {
        s.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown priority: {needle}"))
    }
}

/// One unit of work extracted from generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Keeps the first [`TITLE_MAX_CHARS`] characters; no ellipsis.
pub fn truncate_title(raw: &str) -> String {
    raw.chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_tracker_scale() {
        assert_eq!(Priority::Low.tracker_value(), 1);
        assert_eq!(Priority::Medium.tracker_value(), 2);
        assert_eq!(Priority::High.tracker_value(), 3);
        assert_eq!(Priority::Urgent.tracker_value(), 4);
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" Urgent ".parse::<Priority>().unwrap(), Priority::Urgent);
        assert!("critical".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_lenient_lookup_defaults_to_medium() {
        assert_eq!(Priority::from_str_or_default(None), Priority::Medium);
        assert_eq!(Priority::from_str_or_default(Some("nope")), Priority::Medium);
        assert_eq!(Priority::from_str_or_default(Some("low")), Priority::Low);
    }

    #[test]
    fn truncate_title_counts_chars_not_bytes() {
        let raw = "á".repeat(80);
        let out = truncate_title(&raw);
        assert_eq!(out.chars().count(), TITLE_MAX_CHARS);
        assert_eq!(truncate_title("short"), "short");
    }

    #[test]
    fn task_record_serializes_lowercase_priority_and_skips_empty_options() {
        let rec = TaskRecord {
            title: "Build login".into(),
            description: String::new(),
            priority: Priority::High,
            tags: vec!["auth".into()],
            project: None,
            parent: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"priority\":\"high\""));
        assert!(!json.contains("project"));
        assert!(!json.contains("parent"));
    }

    #[test]
    fn task_record_deserializes_with_defaults() {
        let rec: TaskRecord = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(rec.priority, Priority::Medium);
        assert!(rec.tags.is_empty());
        assert!(rec.description.is_empty());
    }
}
