use async_trait::async_trait;

/// Generative-text service that turns a prompt into structured task text.
#[async_trait]
pub trait TaskGenerator: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: String) -> anyhow::Result<String>;
}
