use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

use crate::dsl::prompt::PromptPayload;
use crate::error::ModelError;
use crate::llm::PixelModel;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl PixelModel for GeminiClient {
    async fn generate(&self, payload: &PromptPayload) -> Result<String, ModelError> {
        let body = request_body(payload);
        debug!("POST {} (model {})", self.endpoint(), self.model);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &text));
        }

        let value: Value = response.json().await?;
        extract_output_text(&value).ok_or(ModelError::EmptyResponse)
    }
}

fn request_body(payload: &PromptPayload) -> Value {
    let mut body = json!({
        "contents": [
            { "role": "user", "parts": [{ "text": payload.user }] }
        ]
    });
    if let Some(system) = &payload.system {
        body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    body
}

/// Maps a non-success response onto a typed error from its status and the
/// `error` object Gemini puts in the body.
fn classify_error(status: u16, body: &str) -> ModelError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(body)
        .to_string();
    let key_rejected = error
        .and_then(|e| e.get("details"))
        .and_then(Value::as_array)
        .map(|details| {
            details
                .iter()
                .any(|d| d.get("reason").and_then(Value::as_str) == Some("API_KEY_INVALID"))
        })
        .unwrap_or(false);

    match status {
        401 | 403 => ModelError::InvalidApiKey(message),
        400 if key_rejected => ModelError::InvalidApiKey(message),
        404 => ModelError::ModelNotFound(message),
        429 => ModelError::RateLimited(message),
        _ => ModelError::Http { status, message },
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_output_text(value: &Value) -> Option<String> {
    let parts = value
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
