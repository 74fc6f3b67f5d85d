use std::error::Error;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{debug, error, info, warn};
use tokio::net::TcpListener;

use crate::config::{Cli, Commands, Settings};
use crate::dsl::model::{GenerateRequest, PixelSet, PixelsResponse};
use crate::dsl::parser;
use crate::dsl::prompt::{PromptStyle, PromptTemplate};
use crate::dsl::validator::HexPolicy;
use crate::error::GenerateError;
use crate::llm::gemini::GeminiClient;
use crate::llm::PixelModel;

pub const GENERATE_ROUTE: &str = "/api/generate-pixel";

/// Read-only per-process state shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured.
    pub model: Option<Arc<dyn PixelModel>>,
    pub template: Arc<PromptTemplate>,
    pub prompt_style: PromptStyle,
    pub hex_policy: HexPolicy,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        let model = settings.api_key.as_ref().map(|key| {
            Arc::new(GeminiClient::new(key.as_str(), settings.model.as_str(), settings.api_base.as_str()))
                as Arc<dyn PixelModel>
        });
        if model.is_none() {
            warn!("GEMINI_API_KEY is not set; generation requests will fail");
        }
        Self {
            model,
            template: Arc::new(PromptTemplate::load(&settings.template)),
            prompt_style: settings.prompt_style,
            hex_policy: settings.hex_policy,
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let state = AppState::from_settings(&Settings::from(&cli));

    match cli.command {
        Some(Commands::Generate { prompt }) => generate_once(&state, &prompt).await,
        Some(Commands::Serve) | None => serve(state, &cli.bind).await,
    }
}

async fn serve(state: AppState, bind: &str) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(bind).await?;
    info!("Listening on http://{}{}", listener.local_addr()?, GENERATE_ROUTE);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn generate_once(state: &AppState, prompt: &str) -> Result<(), Box<dyn Error>> {
    match generate(state, Some(prompt)).await {
        Ok(pixels) => {
            println!("{}", serde_json::to_string_pretty(&PixelsResponse { pixels })?);
            Ok(())
        }
        Err(err) => Err(err.public_message().into()),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GENERATE_ROUTE, post(generate_pixel))
        .with_state(state)
}

pub async fn generate_pixel(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let prompt = match body {
        Ok(Json(request)) => request.prompt,
        Err(rejection) => {
            warn!("Unreadable request body: {}", rejection);
            None
        }
    };

    match generate(&state, prompt.as_deref()).await {
        Ok(pixels) => Json(PixelsResponse { pixels }).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Prompt in, validated pixels out. Every failure is terminal for the request.
pub async fn generate(state: &AppState, prompt: Option<&str>) -> Result<PixelSet, GenerateError> {
    let result = run_pipeline(state, prompt).await;
    match &result {
        Ok(pixels) => info!("Generated {} pixels", pixels.len()),
        Err(GenerateError::Input) => warn!("Rejected request: prompt is required"),
        Err(err) => error!("Error generating pixel: {}", err),
    }
    result
}

async fn run_pipeline(state: &AppState, prompt: Option<&str>) -> Result<PixelSet, GenerateError> {
    let prompt = prompt.filter(|p| !p.is_empty()).ok_or(GenerateError::Input)?;
    let model = state.model.as_ref().ok_or(GenerateError::Configuration)?;

    info!("Sending request to Gemini with prompt: {}", prompt);
    let payload = state.template.build(prompt, state.prompt_style);
    let text = model.generate(&payload).await?;
    debug!("Gemini raw response: {}", text);

    Ok(parser::parse_pixels(&text, state.hex_policy)?)
}
