//! Gemini `generateContent` backend over blocking HTTP.

use super::{GenerationError, GenerationResult, TextGenerator};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for the Gemini REST API.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: None,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Blocking Gemini client, built once and reused for the process lifetime.
pub struct GeminiGenerator {
    client: Client,
    endpoint: String,
    model: String,
}

impl GeminiGenerator {
    /// Builds the HTTP client with the credential baked into default headers.
    ///
    /// # Errors
    /// - `MissingApiKey` when the key is blank.
    /// - `Transport` when the key is not a valid header value or the client
    ///   cannot be constructed.
    pub fn new(settings: &GeminiSettings) -> GenerationResult<Self> {
        let api_key = settings.api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|_| GenerationError::Transport("invalid API key header".to_string()))?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GenerationError::Transport(format!("failed to build client: {err}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint(),
            model: settings.model.clone(),
        })
    }
}

impl TextGenerator for GeminiGenerator {
    fn complete(&self, prompt: &str) -> GenerationResult<String> {
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });
        debug!(
            "event=gemini_request module=generator status=start model={} prompt_len={}",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body: text,
            });
        }

        let payload = response
            .json::<Value>()
            .map_err(|err| GenerationError::InvalidResponse(err.to_string()))?;
        extract_reply_text(&payload)
    }
}

/// Pulls the reply text out of a `generateContent` response body.
///
/// Concatenates every text part of the first candidate.
pub fn extract_reply_text(payload: &Value) -> GenerationResult<String> {
    let candidate = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first());

    let Some(candidate) = candidate else {
        if let Some(reason) = payload
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
        {
            return Err(GenerationError::Blocked(reason.to_string()));
        }
        return Err(GenerationError::InvalidResponse(
            "response has no candidates".to_string(),
        ));
    };

    let text = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(reason) = candidate.get("finishReason").and_then(Value::as_str) {
            if reason != "STOP" {
                return Err(GenerationError::Blocked(reason.to_string()));
            }
        }
        return Err(GenerationError::EmptyReply);
    }

    Ok(text)
}
