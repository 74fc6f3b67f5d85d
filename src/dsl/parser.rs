use std::sync::OnceLock;

use regex::Regex;

use crate::dsl::model::PixelSet;
use crate::dsl::validator::{self, HexPolicy};
use crate::error::PixelError;

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?i)```[a-z0-9_+-]*").expect("fence pattern is valid"))
}

/// Locates the outermost `[ ... ]` span in model output, ignoring markdown
/// fences and any commentary around the array.
pub fn extract_array(raw: &str) -> Result<String, PixelError> {
    let unfenced = fence_pattern().replace_all(raw, "");
    let cleaned = unfenced.trim();

    match (cleaned.find('['), cleaned.rfind(']')) {
        (Some(start), Some(end)) if start < end => Ok(cleaned[start..=end].to_string()),
        _ => Err(PixelError::Extraction),
    }
}

/// Model text in, validated pixels out.
pub fn parse_pixels(raw: &str, policy: HexPolicy) -> Result<PixelSet, PixelError> {
    let array = extract_array(raw)?;
    validator::validate_pixels(&array, policy)
}
