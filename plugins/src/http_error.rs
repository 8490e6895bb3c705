use serde_json::Value;
use std::{error::Error as StdError, fmt};

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiHttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Graphql,
    Unknown,
}

impl ApiHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Graphql => "graphql",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ApiHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to an upstream API, carried inside `anyhow::Error` and
/// recovered with `downcast_ref` by callers that need the category.
#[derive(Debug)]
pub struct ApiHttpError {
    service: &'static str,
    kind: ApiHttpErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl ApiHttpError {
    pub fn kind(&self) -> ApiHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn from_reqwest(service: &'static str, err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            ApiHttpErrorKind::Timeout
        } else if err.is_connect() {
            ApiHttpErrorKind::Connect
        } else if err.is_request() {
            ApiHttpErrorKind::Request
        } else if err.is_body() {
            ApiHttpErrorKind::Body
        } else if err.is_decode() {
            ApiHttpErrorKind::Decode
        } else {
            ApiHttpErrorKind::Unknown
        };
        let status = err.status().map(|s| s.as_u16());
        let message = err.to_string();
        ApiHttpError {
            service,
            kind,
            status,
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub(crate) fn status_error(
        service: &'static str,
        status: u16,
        url: String,
        preview: String,
    ) -> Self {
        ApiHttpError {
            service,
            kind: ApiHttpErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message: preview,
            source: None,
        }
    }

    pub(crate) fn decode_error(
        service: &'static str,
        status: u16,
        url: String,
        err: serde_json::Error,
        preview: String,
    ) -> Self {
        let message = format!("failed to decode response body: {} | body={}", err, preview);
        ApiHttpError {
            service,
            kind: ApiHttpErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    /// Well-formed JSON that does not have the expected shape.
    pub(crate) fn shape_error(service: &'static str, url: &str, what: impl Into<String>) -> Self {
        ApiHttpError {
            service,
            kind: ApiHttpErrorKind::Decode,
            status: None,
            url: Some(url.to_string()),
            message: what.into(),
            source: None,
        }
    }

    pub(crate) fn graphql_error(service: &'static str, url: &str, message: String) -> Self {
        ApiHttpError {
            service,
            kind: ApiHttpErrorKind::Graphql,
            status: None,
            url: Some(url.to_string()),
            message,
            source: None,
        }
    }
}

impl fmt::Display for ApiHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} http error kind={}", self.service, self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for ApiHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

pub(crate) async fn parse_json_response(
    service: &'static str,
    resp: reqwest::Response,
) -> anyhow::Result<Value> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| ApiHttpError::from_reqwest(service, err, url.clone()))?;

    if !status.is_success() {
        let preview = preview_body(&body);
        return Err(ApiHttpError::status_error(service, status.as_u16(), url, preview).into());
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str::<Value>(&body).map_err(|err| {
        let preview = preview_body(&body);
        ApiHttpError::decode_error(service, status.as_u16(), url, err, preview).into()
    })
}
