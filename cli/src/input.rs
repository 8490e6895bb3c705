//! Reads request text from --text, --file or stdin.
use std::path::Path;

use taskforge_core::api::CliError;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::commands::cli::InputArgs;

pub async fn read_file(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::Command(format!("failed to read {}: {e}", path.display())))
}

pub async fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf)
}

/// Resolves the request text; blank input is rejected.
pub async fn read_request(input: &InputArgs) -> Result<String, CliError> {
    let text = match (&input.text, &input.file) {
        (Some(t), _) => t.clone(),
        (None, Some(path)) => read_file(path).await?,
        (None, None) => read_stdin().await?,
    };
    if text.trim().is_empty() {
        return Err(CliError::Command("request text is empty".into()));
    }
    Ok(text)
}

/// Asks a yes/no question on stderr; anything but y/yes is a no.
pub async fn confirm(question: &str) -> Result<bool, CliError> {
    eprint!("{question} [y/N] ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí")
}
