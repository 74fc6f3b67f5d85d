use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};
use simplelog::LevelFilter;

use crate::dsl::prompt::PromptStyle;
use crate::dsl::validator::HexPolicy;
use crate::llm::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Parser)]
#[command(version, about = "Turns text prompts into 16x16 pixel art via Gemini")]
pub struct Cli {
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "PIXEL_PROMPT_TEMPLATE", default_value = "prompts/pixel.txt")]
    pub template: PathBuf,

    /// Send the template as a system instruction and the prompt as its own message
    #[arg(long, env = "PIXEL_SPLIT_PROMPT", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub split_prompt: bool,

    /// Reject colours that are not #RRGGBB
    #[arg(long, env = "PIXEL_STRICT_HEX", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub strict_hex: bool,

    /// Address the HTTP endpoint listens on
    #[arg(long, global = true, env = "PIXEL_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// off, error, warn, info, debug or trace
    #[arg(long, env = "PIXEL_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the HTTP endpoint (default)
    Serve,

    /// Generate pixels for one prompt and print them as JSON
    #[command(arg_required_else_help = true)]
    Generate { prompt: String },
}

impl Cli {
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub template: PathBuf,
    pub prompt_style: PromptStyle,
    pub hex_policy: HexPolicy,
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            api_key: cli.api_key.clone().filter(|key| !key.trim().is_empty()),
            model: cli.model.clone(),
            api_base: cli.api_base.clone(),
            template: cli.template.clone(),
            prompt_style: if cli.split_prompt { PromptStyle::Split } else { PromptStyle::Inline },
            hex_policy: if cli.strict_hex { HexPolicy::Strict } else { HexPolicy::Lenient },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_settings() {
        let cli = Cli::try_parse_from([
            "pixel-prompt",
            "--api-key",
            "secret",
            "--model",
            "gemini-2.0-flash",
            "--split-prompt",
            "--strict-hex",
            "generate",
            "a red apple",
        ])
        .unwrap();
        let settings = Settings::from(&cli);
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.prompt_style, PromptStyle::Split);
        assert_eq!(settings.hex_policy, HexPolicy::Strict);
        assert!(matches!(cli.command, Some(Commands::Generate { ref prompt }) if prompt == "a red apple"));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let cli = Cli::try_parse_from(["pixel-prompt", "--log-level", "chatty", "serve"]).unwrap();
        assert_eq!(cli.log_filter(), LevelFilter::Info);
        let cli = Cli::try_parse_from(["pixel-prompt", "--log-level", "debug", "serve"]).unwrap();
        assert_eq!(cli.log_filter(), LevelFilter::Debug);
    }

    #[test]
    fn serve_accepts_bind_flag() {
        let cli = Cli::try_parse_from(["pixel-prompt", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        assert_eq!(cli.bind, "0.0.0.0:8080");
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    // Env-backed flags share one test so the variables are never set concurrently.
    #[test]
    fn env_vars_configure_flags() {
        std::env::set_var("PIXEL_BIND", "0.0.0.0:9999");
        std::env::set_var("PIXEL_STRICT_HEX", "1");
        std::env::set_var("PIXEL_SPLIT_PROMPT", "1");
        let cli = Cli::try_parse_from(["pixel-prompt"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.bind, "0.0.0.0:9999");
        let settings = Settings::from(&cli);
        assert_eq!(settings.hex_policy, HexPolicy::Strict);
        assert_eq!(settings.prompt_style, PromptStyle::Split);

        std::env::set_var("PIXEL_STRICT_HEX", "0");
        std::env::set_var("PIXEL_SPLIT_PROMPT", "0");
        let cli = Cli::try_parse_from(["pixel-prompt", "serve"]).unwrap();
        let settings = Settings::from(&cli);
        assert_eq!(settings.hex_policy, HexPolicy::Lenient);
        assert_eq!(settings.prompt_style, PromptStyle::Inline);

        std::env::remove_var("PIXEL_BIND");
        std::env::remove_var("PIXEL_STRICT_HEX");
        std::env::remove_var("PIXEL_SPLIT_PROMPT");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cli = Cli::try_parse_from(["pixel-prompt", "--api-key", "  ", "serve"]).unwrap();
        assert!(Settings::from(&cli).api_key.is_none());
    }
}
