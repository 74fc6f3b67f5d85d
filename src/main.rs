mod config;
mod dsl;
mod error;
mod llm;
mod orchestrator;

use clap::Parser;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use crate::config::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_filter());

    if let Err(err) = orchestrator::run(cli).await {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}

// Logs go to stderr so `generate` output on stdout stays clean JSON.
fn init_logger(level: LevelFilter) {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialize terminal logger: {}", e);
    }
}
