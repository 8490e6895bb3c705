use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskforge_core::api::TaskGenerator;

use crate::http_error::{parse_json_response, ApiHttpError};

const SERVICE: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client that turns a prompt into structured task text.
#[derive(Clone)]
pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    temperature: f32,
    http: reqwest::Client,
    url_chat: String,
}

impl OpenAiGenerator {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        temperature: f32,
        timeout_ms: u64,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let normalized = base_url.trim_end_matches('/');
        Ok(Self {
            api_key,
            model,
            temperature,
            http,
            url_chat: format!("{}/chat/completions", normalized),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TaskGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let url = &self.url_chat;
        tracing::debug!(
            target: "taskforge.generator",
            stage = "generator.openai.in",
            url = %url,
            model = %self.model,
            prompt_len = prompt.len()
        );

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
        };
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ApiHttpError::from_reqwest(SERVICE, err, url.clone()))?;
        let status = resp.status();
        let raw = parse_json_response(SERVICE, resp).await?;

        let parsed: ChatResponse = if raw.is_null() {
            ChatResponse::default()
        } else {
            serde_json::from_value(raw).map_err(|e| {
                ApiHttpError::shape_error(SERVICE, url, format!("unexpected completion shape: {e}"))
            })?
        };
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        tracing::debug!(
            target: "taskforge.generator",
            stage = "generator.openai.out",
            status = %status,
            output_len = content.len()
        );
        Ok(content)
    }
}
