pub mod gemini;

use async_trait::async_trait;

use crate::dsl::prompt::PromptPayload;
use crate::error::ModelError;

/// A text model that turns an instruction payload into raw response text.
#[async_trait]
pub trait PixelModel: Send + Sync {
    async fn generate(&self, payload: &PromptPayload) -> Result<String, ModelError>;
}
