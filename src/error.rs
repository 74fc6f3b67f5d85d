use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::dsl::model::ErrorResponse;

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const API_KEY_MISSING: &str =
    "Gemini API key not configured. Please add GEMINI_API_KEY to your environment.";
pub const API_KEY_INVALID: &str =
    "Invalid Gemini API key. Please check your GEMINI_API_KEY configuration.";
pub const MODEL_NOT_FOUND: &str =
    "Gemini model not found. Please check the configured model name.";
pub const GENERATION_FAILED: &str = "Failed to generate pixel. Please try again.";

/// Failures while turning model text into pixels.
#[derive(Error, Debug)]
pub enum PixelError {
    #[error("no JSON array found in model output")]
    Extraction,

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid response: not an array")]
    Shape,

    #[error("invalid pixel at index {index}: {reason}")]
    Element { index: usize, reason: String },
}

/// Failures of the model invocation itself.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model rejected the API key: {0}")]
    InvalidApiKey(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model returned no text")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("prompt is missing or empty")]
    Input,

    #[error("GEMINI_API_KEY is not configured")]
    Configuration,

    #[error("model invocation failed: {0}")]
    Model(#[from] ModelError),

    #[error("unusable model response: {0}")]
    Response(#[from] PixelError),
}

impl GenerateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::Input => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the caller. Response failures all collapse to
    /// the generic retry message.
    pub fn public_message(&self) -> &'static str {
        match self {
            GenerateError::Input => PROMPT_REQUIRED,
            GenerateError::Configuration => API_KEY_MISSING,
            GenerateError::Model(ModelError::InvalidApiKey(_)) => API_KEY_INVALID,
            GenerateError::Model(ModelError::ModelNotFound(_)) => MODEL_NOT_FOUND,
            GenerateError::Model(_) | GenerateError::Response(_) => GENERATION_FAILED,
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let body = ErrorResponse { error: self.public_message().to_string() };
        (self.status(), Json(body)).into_response()
    }
}
