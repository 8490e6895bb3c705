//! Field extraction rules, one per labelled field.
//!
//! Every rule is total: a missing or malformed field yields the documented
//! default. Only [`FieldRules::title`] can reject a segment.

use regex::Regex;

use super::grammar::TaskGrammar;
use crate::task::{truncate_title, Priority};

/// Pattern used for an empty alias list so that it never matches.
const NEVER: &str = r"[^\s\S]";

fn alternation(items: &[String]) -> String {
    let parts: Vec<String> = items
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| regex::escape(s))
        .collect();
    if parts.is_empty() {
        NEVER.to_string()
    } else {
        parts.join("|")
    }
}

/// Rules compiled from one [`TaskGrammar`].
#[derive(Debug, Clone)]
pub struct FieldRules {
    child_marker: Regex,
    parent_heading: Regex,
    separators: Vec<String>,
    description_label: Regex,
    criteria_line: Regex,
    criteria_label: Regex,
    priority: Regex,
    tags: Regex,
    project: Regex,
    criteria_heading: String,
    bullet: String,
}

impl FieldRules {
    pub fn compile(grammar: &TaskGrammar) -> Result<Self, regex::Error> {
        let child = alternation(&grammar.child_markers);
        let parent = alternation(&grammar.parent_markers);
        let description = alternation(&grammar.description_labels);
        let criteria = alternation(&grammar.criteria_labels);
        let priority = alternation(&grammar.priority_labels);
        let tags = alternation(&grammar.tags_labels);
        let project = alternation(&grammar.project_labels);

        Ok(Self {
            child_marker: Regex::new(&format!(r"(?m)^[ \t]*(?:{child})"))?,
            parent_heading: Regex::new(&format!(
                r"(?m)^[ \t]*(?:{parent})[ \t]*(?:\d+(?:\.\d+)*)?[ \t]*(?:[:–—-][ \t]*)?([^\r\n]*)"
            ))?,
            separators: grammar
                .title_separators
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
            description_label: Regex::new(&format!("(?:{description})"))?,
            criteria_line: Regex::new(&format!(r"(?m)^[ \t]*(?:{criteria})"))?,
            criteria_label: Regex::new(&format!("(?:{criteria})"))?,
            priority: Regex::new(&format!(r"(?i)(?:{priority})\s*(urgent|high|medium|low)"))?,
            tags: Regex::new(&format!(r"(?:{tags})[ \t]*([^\r\n]*)"))?,
            project: Regex::new(&format!(r"(?:{project})[ \t]*([^\r\n]*)"))?,
            criteria_heading: grammar.criteria_heading.clone(),
            bullet: grammar.bullet.clone(),
        })
    }

    /// Splits a document on the child marker. The first element is the text
    /// before the first marker; each following element starts right after a
    /// marker and runs to the next one.
    pub fn split<'a>(&self, document: &'a str) -> (&'a str, Vec<&'a str>) {
        let marks: Vec<(usize, usize)> = self
            .child_marker
            .find_iter(document)
            .map(|m| (m.start(), m.end()))
            .collect();

        let Some(&(first_start, _)) = marks.first() else {
            return (document, Vec::new());
        };

        let fragments = marks
            .iter()
            .enumerate()
            .map(|(i, &(_, end))| {
                let next = marks.get(i + 1).map(|&(s, _)| s).unwrap_or(document.len());
                &document[end..next]
            })
            .collect();

        (&document[..first_start], fragments)
    }

    /// Cuts a fragment at its first parent heading. Returns the task body and,
    /// when at least one heading was found, the name of the last one
    /// (`Some(None)` for a heading without a name).
    pub fn split_parent<'a>(&self, fragment: &'a str) -> (&'a str, Option<Option<String>>) {
        let mut body_end = fragment.len();
        let mut last = None;
        for (i, caps) in self.parent_heading.captures_iter(fragment).enumerate() {
            if i == 0 {
                if let Some(m) = caps.get(0) {
                    body_end = m.start();
                }
            }
            let name = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
            last = Some(name);
        }
        (&fragment[..body_end], last)
    }

    /// Heading text after the first separator on the segment's first line.
    pub fn title(&self, segment: &str) -> Option<String> {
        let first_line = segment.split('\n').next().unwrap_or_default();
        let (at, len) = self
            .separators
            .iter()
            .filter_map(|sep| first_line.find(sep.as_str()).map(|i| (i, sep.len())))
            .min_by_key(|&(i, _)| i)?;
        let raw = first_line[at + len..].trim();
        if raw.is_empty() {
            return None;
        }
        Some(truncate_title(raw))
    }

    /// Text after the description label up to a line starting with the
    /// criteria label, trimmed.
    pub fn description(&self, segment: &str) -> String {
        let Some(label) = self.description_label.find(segment) else {
            return String::new();
        };
        let rest = &segment[label.end()..];
        let end = self
            .criteria_line
            .find(rest)
            .map(|m| m.start())
            .unwrap_or(rest.len());
        rest[..end].trim().to_string()
    }

    /// Consecutive `- ` bullet lines under the criteria label, without the dash.
    pub fn criteria(&self, segment: &str) -> Vec<String> {
        let Some(label) = self.criteria_label.find(segment) else {
            return Vec::new();
        };
        let mut lines = segment[label.end()..].split('\n');

        // Bullets must start on a line of their own.
        if lines
            .next()
            .map(|tail| !tail.trim().is_empty())
            .unwrap_or(true)
        {
            return Vec::new();
        }

        let mut bullets = Vec::new();
        let mut started = false;
        for line in lines {
            if let Some(text) = line.trim_start().strip_prefix("- ") {
                started = true;
                let text = text.trim_end();
                if !text.is_empty() {
                    bullets.push(text.to_string());
                }
            } else if !started && line.trim().is_empty() {
                continue;
            } else {
                break;
            }
        }
        bullets
    }

    pub fn render_criteria(&self, bullets: &[String]) -> Option<String> {
        if bullets.is_empty() {
            return None;
        }
        Some(
            bullets
                .iter()
                .map(|b| format!("{} {}", self.bullet, b))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    pub fn compose_description(&self, description: &str, criteria: Option<&str>) -> String {
        match criteria {
            Some(c) => format!("{}\n\n{}\n{}", description, self.criteria_heading, c),
            None => description.to_string(),
        }
    }

    pub fn priority(&self, segment: &str) -> Priority {
        self.priority
            .captures(segment)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or_default()
    }

    pub fn tags(&self, segment: &str) -> Vec<String> {
        let Some(value) = self
            .tags
            .captures(segment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            return Vec::new();
        };
        if value.trim().is_empty() {
            return Vec::new();
        }
        value
            .split(',')
            .map(|t| t.trim().to_string())
            .collect()
    }

    pub fn project(&self, segment: &str) -> Option<String> {
        self.project
            .captures(segment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules() -> FieldRules {
        FieldRules::compile(&TaskGrammar::v1()).unwrap()
    }

    #[test]
    fn split_discards_text_before_first_marker() {
        let doc = "## Tarea Padre 1: Auth\n\n### Tarea 1.1 – A\nx\n### Tarea 1.2 – B\ny\n";
        let (preamble, fragments) = rules().split(doc);
        assert_eq!(preamble, "## Tarea Padre 1: Auth\n\n");
        assert_eq!(fragments, vec![" 1.1 – A\nx\n", " 1.2 – B\ny\n"]);
    }

    #[test]
    fn split_matches_marker_on_first_line() {
        let (preamble, fragments) = rules().split("### Tarea 1.1 – A\n");
        assert_eq!(preamble, "");
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn split_ignores_marker_in_the_middle_of_a_line() {
        let (_, fragments) = rules().split("see ### Tarea 1.1 – A\n");
        assert!(fragments.is_empty());
    }

    #[test]
    fn split_does_not_treat_parent_heading_as_child() {
        let (_, fragments) = rules().split("## Tarea Padre 1: X\n#### Tarea notes\n");
        assert!(fragments.is_empty());
    }

    #[test]
    fn split_parent_cuts_body_and_reports_last_name() {
        let fragment = " 1.2 – B\nbody\n\n---\n\n## Tarea Padre 2: Billing\n\n";
        let (body, parent) = rules().split_parent(fragment);
        assert_eq!(body, " 1.2 – B\nbody\n\n---\n\n");
        assert_eq!(parent, Some(Some("Billing".to_string())));
    }

    #[test]
    fn split_parent_without_heading() {
        let (body, parent) = rules().split_parent(" 1.1 – A\n");
        assert_eq!(body, " 1.1 – A\n");
        assert_eq!(parent, None);
    }

    #[test]
    fn title_splits_on_earliest_separator_not_last_dash() {
        // Later dashes belong to the title text.
        let r = rules();
        assert_eq!(r.title(" 1.1 – Build login  \nrest").as_deref(), Some("Build login"));
        assert_eq!(r.title(" 1.1 — Em dash").as_deref(), Some("Em dash"));
        assert_eq!(r.title(" 1.1 - Hyphen - with dash").as_deref(), Some("Hyphen - with dash"));
        assert_eq!(r.title(" 1.1 – Login – phase 2").as_deref(), Some("Login – phase 2"));
    }

    #[test]
    fn title_rejects_missing_separator_or_empty_text() {
        let r = rules();
        assert_eq!(r.title(" 1.1 Build login\n"), None);
        assert_eq!(r.title(" 1.1 –   \nDescripcion:\nx"), None);
        assert_eq!(r.title(""), None);
    }

    #[test]
    fn title_separator_must_be_on_first_line() {
        assert_eq!(rules().title(" 1.1\n– Build login"), None);
    }

    #[test]
    fn title_is_truncated_to_seventy_chars() {
        let long = "x".repeat(100);
        let title = rules().title(&format!(" 1.1 – {long}\n")).unwrap();
        assert_eq!(title, "x".repeat(70));
    }

    #[test]
    fn description_stops_at_criteria_label() {
        let seg = " 1.1 – A\nDescripcion:\n  Add OAuth\n  flow\n\nCriterios de aceptación:\n- a\n";
        assert_eq!(rules().description(seg), "Add OAuth\n  flow");
    }

    #[test]
    fn description_runs_to_end_without_criteria() {
        let seg = " 1.1 – A\nDescripcion:\nAdd OAuth\n\nPriority: high\n";
        assert_eq!(rules().description(seg), "Add OAuth\n\nPriority: high");
    }

    #[test]
    fn description_accepts_aliases_and_inline_text() {
        let r = rules();
        assert_eq!(r.description(" 1.1 – A\nDescription: inline\n"), "inline");
        assert_eq!(r.description(" 1.1 – A\nDescripción:\nacentos\n"), "acentos");
    }

    #[test]
    fn description_defaults_to_empty() {
        assert_eq!(rules().description(" 1.1 – A\nPriority: low\n"), "");
    }

    #[test]
    fn criteria_collects_consecutive_bullets() {
        let seg = "Criterios de aceptación:\n\n- Given a When b Then c  \n- Given d\n\nPriority: high\n- not a criterion\n";
        assert_eq!(
            rules().criteria(seg),
            vec!["Given a When b Then c".to_string(), "Given d".to_string()]
        );
    }

    #[test]
    fn criteria_requires_bullets_on_following_lines() {
        let r = rules();
        assert!(r.criteria("Criterios de aceptación: - inline\n").is_empty());
        assert!(r.criteria("Criterios de aceptación:").is_empty());
        assert!(r.criteria("no label here\n- x\n").is_empty());
    }

    #[test]
    fn criteria_accepts_last_bullet_without_newline() {
        assert_eq!(
            rules().criteria("Acceptance Criteria:\n- only one"),
            vec!["only one".to_string()]
        );
    }

    #[test]
    fn render_and_compose() {
        let r = rules();
        let rendered = r
            .render_criteria(&["first".to_string(), "second".to_string()])
            .unwrap();
        assert_eq!(rendered, "• first\n• second");
        assert_eq!(
            r.compose_description("Implement X", Some(&rendered)),
            "Implement X\n\n**Criterios de aceptación:**\n• first\n• second"
        );
        assert_eq!(r.compose_description("Implement X", None), "Implement X");
        assert_eq!(r.render_criteria(&[]), None);
    }

    #[test]
    fn priority_is_case_insensitive_and_defaults() {
        let r = rules();
        assert_eq!(r.priority("Priority: HIGH\n"), Priority::High);
        assert_eq!(r.priority("priority:urgent"), Priority::Urgent);
        assert_eq!(r.priority("Prioridad: low"), Priority::Low);
        assert_eq!(r.priority("Priority: critical\n"), Priority::Medium);
        assert_eq!(r.priority("no label"), Priority::Medium);
    }

    #[test]
    fn priority_skips_unrecognised_value_for_a_later_valid_one() {
        assert_eq!(
            rules().priority("Priority: critical\nPriority: low\n"),
            Priority::Low
        );
    }

    #[test]
    fn tags_are_trimmed_and_keep_order_and_case() {
        let r = rules();
        assert_eq!(
            r.tags("Tags:  Frontend , auth,ux-ui  \n"),
            vec!["Frontend", "auth", "ux-ui"]
        );
        assert_eq!(r.tags("Tags: a, a"), vec!["a", "a"]);
        assert!(r.tags("Tags:   \n").is_empty());
        assert!(r.tags("nothing").is_empty());
    }

    #[test]
    fn tags_keep_empty_items_between_commas() {
        assert_eq!(rules().tags("Tags: a,, b ,\n"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn project_label() {
        let r = rules();
        assert_eq!(r.project("Proyecto: Backend API  \n").as_deref(), Some("Backend API"));
        assert_eq!(r.project("Proyecto:\n"), None);
        assert_eq!(r.project("none"), None);
    }

    #[test]
    fn empty_alias_lists_never_match() {
        let mut g = TaskGrammar::v1();
        g.tags_labels.clear();
        let r = FieldRules::compile(&g).unwrap();
        assert!(r.tags("Tags: a, b").is_empty());
    }
}
