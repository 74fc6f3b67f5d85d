use serde::{Deserialize, Serialize};

pub const GRID_SIZE: u8 = 16;
pub const GRID_MAX: u8 = GRID_SIZE - 1;

/// One coloured cell on the 16×16 grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pixel {
    pub hex_code: String,
    pub column: u8,
    pub row: u8,
}

/// Pixels in the order the model returned them. Duplicates are kept.
pub type PixelSet = Vec<Pixel>;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PixelsResponse {
    pub pixels: PixelSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
