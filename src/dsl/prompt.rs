use std::path::Path;

use log::debug;

pub const PLACEHOLDER: &str = "{userPrompt}";

const DEFAULT_TEMPLATE: &str = "You are a professional pixel artist drawing art on a 16x16 grid of JSON pixels.

Generate 16x16 pixel art for: {userPrompt}

Canvas and positioning:
- Draw inside a 16x16 grid (rows 0-15, columns 0-15).
- Keep the subject centered and proportional, with the whole object on the canvas.
- Leave roughly 40-50% of the canvas as empty background.
- Avoid touching column 0 or 15 unless the shape demands it.

Colours:
- Use only 3 to 6 HEX colours that suit the subject.
- Use a base colour with light, mid and dark shading.
- Never output white (#FFFFFF); the background stays uncoloured.

Pixel count:
- Use between 140 and 256 coloured pixels.

Quality:
- Start with a clear dark outline, fill the main colours, then add details.
- Avoid random or noisy pixels.

Shapes:
- Circle: an oval of pixels with rounded edges.
- Triangle: 3-5 rows narrowing from bottom to top. A \"slice\" is a triangle.
- Rectangle: a straight block. Centering means equal padding left and right.

Output format:
Return ONLY a JSON array, with no extra text or explanation. Example:
[
  { \"hexCode\": \"#FF0000\", \"column\": 6, \"row\": 5 },
  { \"hexCode\": \"#000000\", \"column\": 7, \"row\": 6 }
]
";

/// Shape of the text sent to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStyle {
    /// A single message: the template with the prompt substituted.
    #[default]
    Inline,
    /// The rendered template as system instruction, the raw prompt as the user message.
    Split,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system: Option<String>,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { text: DEFAULT_TEMPLATE.to_string() }
    }
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads a template from disk, or the built-in one if the file can't be read.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!("Loaded prompt template from {}", path.display());
                Self::new(text)
            }
            Err(e) => {
                debug!("Using built-in prompt template ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn render(&self, prompt: &str) -> String {
        self.text.replace(PLACEHOLDER, prompt)
    }

    pub fn build(&self, prompt: &str, style: PromptStyle) -> PromptPayload {
        match style {
            PromptStyle::Inline => PromptPayload { system: None, user: self.render(prompt) },
            PromptStyle::Split => PromptPayload {
                system: Some(self.render(prompt)),
                user: prompt.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_placeholder_is_replaced() {
        let template = PromptTemplate::new("draw {userPrompt}; again: {userPrompt}");
        assert_eq!(template.render("a cat"), "draw a cat; again: a cat");
    }

    #[test]
    fn default_template_carries_constraints() {
        let text = PromptTemplate::default().render("pizza slice");
        assert!(text.contains("Generate 16x16 pixel art for: pizza slice"));
        assert!(text.contains("140 and 256"));
        assert!(text.contains("#FFFFFF"));
        assert!(text.contains("\"hexCode\""));
        assert!(!text.contains(PLACEHOLDER));
    }

    #[test]
    fn inline_and_split_payloads() {
        let template = PromptTemplate::new("art for {userPrompt}");
        assert_eq!(
            template.build("owl", PromptStyle::Inline),
            PromptPayload { system: None, user: "art for owl".to_string() }
        );
        assert_eq!(
            template.build("owl", PromptStyle::Split),
            PromptPayload { system: Some("art for owl".to_string()), user: "owl".to_string() }
        );
    }

    #[test]
    fn template_file_replaces_built_in() {
        let path = std::env::temp_dir().join(format!("pixel-template-{}.txt", std::process::id()));
        std::fs::write(&path, "Tiny sprite of {userPrompt}, JSON only.").unwrap();
        let template = PromptTemplate::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_ne!(template, PromptTemplate::default());
        assert_eq!(template.render("owl"), "Tiny sprite of owl, JSON only.");
    }

    #[test]
    fn missing_template_file_falls_back() {
        let template = PromptTemplate::load(Path::new("does/not/exist/pixel.txt"));
        assert_eq!(template, PromptTemplate::default());
    }
}
