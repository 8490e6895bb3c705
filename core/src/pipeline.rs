use serde::Serialize;

use crate::generator::TaskGenerator;
use crate::parser::TaskParser;
use crate::prompt::{render_prompt, PromptOptions};
use crate::task::TaskRecord;

/// Output of one generate-then-parse round.
#[derive(Debug, Clone, Serialize)]
pub struct Interpretation {
    pub structured_text: String,
    pub tasks: Vec<TaskRecord>,
    pub grammar_version: String,
}

impl Interpretation {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Renders the prompt from the parser's grammar, asks the generator for
/// structured text and parses it. Only the generator call can fail.
pub async fn interpret(
    generator: &dyn TaskGenerator,
    parser: &TaskParser,
    user_text: &str,
    opts: PromptOptions,
) -> anyhow::Result<Interpretation> {
    let prompt = render_prompt(parser.grammar(), user_text, opts);
    tracing::debug!(
        target: "taskforge.generator",
        generator = generator.name(),
        prompt_len = prompt.len(),
        "requesting structured text"
    );

    let structured_text = generator.generate(prompt).await?;
    let tasks = parser.parse(&structured_text);

    if tasks.is_empty() && !structured_text.is_empty() {
        let report = parser.inspect(&structured_text);
        tracing::warn!(
            target: "taskforge.parser",
            segments = report.segments,
            dropped = report.dropped.len(),
            marker = parser.format_identifier(),
            "generator output produced no tasks"
        );
    }

    Ok(Interpretation {
        structured_text,
        tasks,
        grammar_version: parser.grammar().version.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedGenerator {
        reply: anyhow::Result<String>,
        seen: Mutex<Option<String>>,
    }

    impl CannedGenerator {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TaskGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, prompt: String) -> anyhow::Result<String> {
            *self.seen.lock().unwrap() = Some(prompt);
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    #[tokio::test]
    async fn interpret_parses_generator_output() {
        let generator = CannedGenerator::ok(
            "## Tarea Padre 1: Auth\n\n### Tarea 1.1 – Build login\nDescripcion:\nAdd OAuth\n\nPriority: urgent\nTags: auth\n",
        );
        let parser = TaskParser::default();
        let out = interpret(&generator, &parser, "login please", PromptOptions::default())
            .await
            .unwrap();

        assert_eq!(out.tasks.len(), 1);
        assert_eq!(out.tasks[0].title, "Build login");
        assert_eq!(out.grammar_version, "v1");
        assert!(!out.is_empty());

        let prompt = generator.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("### Tarea 1.1"));
        assert!(prompt.ends_with("login please\n"));
    }

    #[tokio::test]
    async fn interpret_keeps_unstructured_text() {
        let generator = CannedGenerator::ok("Sorry, I cannot help.");
        let out = interpret(&generator, &TaskParser::default(), "x", PromptOptions::default())
            .await
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(out.structured_text, "Sorry, I cannot help.");
    }

    #[tokio::test]
    async fn interpret_propagates_generator_errors() {
        let generator = CannedGenerator {
            reply: Err(anyhow::anyhow!("quota exceeded")),
            seen: Mutex::new(None),
        };
        let err = interpret(&generator, &TaskParser::default(), "x", PromptOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
