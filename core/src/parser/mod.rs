//! Structured task text parser.
//!
//! Turns the plain-text document produced by the generator into
//! [`TaskRecord`]s. Parsing never fails: unrecognised content is skipped and
//! missing fields take their defaults.
//!
//! # Format
//!
//! ```text
//! ## Tarea Padre 1: Login
//!
//! ### Tarea 1.1 – Build login
//! Descripcion:
//! Add OAuth
//!
//! Criterios de aceptación:
//! - Given a user When they click login Then OAuth starts
//!
//! Priority: high
//! Tags: frontend, auth
//! ```

mod grammar;
mod rules;

pub use grammar::{TaskGrammar, DEFAULT_GRAMMAR_VERSION};
pub use rules::FieldRules;

use std::sync::OnceLock;

use crate::task::TaskRecord;

/// One child-task section of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Position among all segments, including ones later dropped.
    pub index: usize,
    pub body: &'a str,
    pub parent: Option<String>,
}

/// Summary of a parse, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatReport {
    pub grammar_version: String,
    pub segments: usize,
    pub parsed: usize,
    /// Segment indexes rejected because no title could be read.
    pub dropped: Vec<usize>,
}

impl FormatReport {
    pub fn has_markers(&self) -> bool {
        self.segments > 0
    }
}

#[derive(Debug, Clone)]
pub struct TaskParser {
    grammar: TaskGrammar,
    rules: FieldRules,
}

impl TaskParser {
    pub fn new(grammar: TaskGrammar) -> Result<Self, regex::Error> {
        let rules = FieldRules::compile(&grammar)?;
        Ok(Self { grammar, rules })
    }

    pub fn grammar(&self) -> &TaskGrammar {
        &self.grammar
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Marker a document must contain to yield any task.
    pub fn format_identifier(&self) -> &str {
        self.grammar.canonical_child_marker()
    }

    pub fn segments<'a>(&self, document: &'a str) -> Vec<Segment<'a>> {
        let (preamble, fragments) = self.rules.split(document);

        let mut parent = None;
        if let (_, Some(name)) = self.rules.split_parent(preamble) {
            parent = name;
        }

        let mut out = Vec::with_capacity(fragments.len());
        for (index, fragment) in fragments.into_iter().enumerate() {
            let (body, heading) = self.rules.split_parent(fragment);
            out.push(Segment {
                index,
                body,
                parent: parent.clone(),
            });
            if let Some(name) = heading {
                parent = name;
            }
        }
        out
    }

    /// Builds a record from one segment, or `None` when it has no title.
    pub fn extract(&self, segment: &Segment<'_>) -> Option<TaskRecord> {
        let body = segment.body;
        let title = self.rules.title(body)?;

        let description = self.rules.description(body);
        let criteria = self.rules.render_criteria(&self.rules.criteria(body));

        Some(TaskRecord {
            title,
            description: self
                .rules
                .compose_description(&description, criteria.as_deref()),
            priority: self.rules.priority(body),
            tags: self.rules.tags(body),
            project: self.rules.project(body),
            parent: segment.parent.clone(),
        })
    }

    pub fn parse(&self, document: &str) -> Vec<TaskRecord> {
        let segments = self.segments(document);
        let total = segments.len();
        let tasks: Vec<TaskRecord> = segments.iter().filter_map(|s| self.extract(s)).collect();

        tracing::debug!(
            target: "taskforge.parser",
            grammar = %self.grammar.version,
            input_len = document.len(),
            segments = total,
            tasks = tasks.len(),
            dropped = total - tasks.len(),
            "parsed structured document"
        );
        tasks
    }

    pub fn inspect(&self, document: &str) -> FormatReport {
        let segments = self.segments(document);
        let dropped: Vec<usize> = segments
            .iter()
            .filter(|s| self.rules.title(s.body).is_none())
            .map(|s| s.index)
            .collect();
        FormatReport {
            grammar_version: self.grammar.version.clone(),
            segments: segments.len(),
            parsed: segments.len() - dropped.len(),
            dropped,
        }
    }
}

impl Default for TaskParser {
    fn default() -> Self {
        default_parser().clone()
    }
}

fn default_parser() -> &'static TaskParser {
    static PARSER: OnceLock<TaskParser> = OnceLock::new();
    PARSER.get_or_init(|| {
        // v1 markers are escaped literals; compiling them cannot fail.
        TaskParser::new(TaskGrammar::v1()).expect("v1 grammar compiles")
    })
}

/// Parses with the default (`v1`) grammar.
pub fn parse(document: &str) -> Vec<TaskRecord> {
    default_parser().parse(document)
}
