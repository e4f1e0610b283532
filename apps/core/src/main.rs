// CLEAR CLI Entry Point
// Thin shell over the core pipeline: argument parsing, config loading and output.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

use clear_core::brain::{Intent, IntentResult, QualityScore, TriageEngine};
use clear_core::{logging, AppConfig, ImprovementResult, Mode, PatternLibrary, PromptOptimizer};

#[derive(Parser)]
#[command(name = "clear")]
#[command(version, about = "Classify, score and improve prompts")]
struct Cli {
    /// JSON config file (falls back to CLEAR_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true, env = "CLEAR_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite a prompt through the pattern pipeline
    Improve {
        /// Prompt text, or `-` to read stdin
        prompt: String,
        /// fast or deep (defaults to the configured mode)
        #[arg(long)]
        mode: Option<Mode>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decide whether a prompt needs deep analysis
    Triage {
        /// Prompt text, or `-` to read stdin
        prompt: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the pipeline selected for an intent and mode
    Patterns {
        #[arg(long, default_value = "code-generation")]
        intent: Intent,
        #[arg(long)]
        mode: Option<Mode>,
    },
}

fn read_prompt(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read prompt from stdin")?;
    Ok(buffer)
}

fn build_library(config: &AppConfig) -> PatternLibrary {
    let mut library = PatternLibrary::builtin();
    library.apply_config(config.patterns.clone());
    library
}

fn print_improvement(result: &ImprovementResult) {
    println!("{}", result.improved);
    println!();
    println!(
        "-- {} | quality {} -> {} ({:+}) | {} pattern(s) applied",
        result.intent.primary_intent,
        result.quality.overall,
        result.improved_quality.overall,
        result.quality_delta,
        result.patterns_applied.len()
    );
    if !result.patterns_failed.is_empty() {
        println!("-- failed: {}", result.patterns_failed.join(", "));
    }
    if result.recommendation.suggested_mode.is_some() {
        println!("-- {}", result.recommendation.message);
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.json_logs);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!(mode = %config.mode, "Configuration ready");

    match cli.command {
        Command::Improve { prompt, mode, json } => {
            let prompt = read_prompt(prompt)?;
            let optimizer = PromptOptimizer::with_library(build_library(&config))
                .with_triage_config(config.triage.clone());
            let result = optimizer.improve(&prompt, mode.unwrap_or(config.mode));

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_improvement(&result);
            }
        }
        Command::Triage { prompt, json } => {
            let prompt = read_prompt(prompt)?;
            let result = TriageEngine::with_config(config.triage.clone()).perform_triage(&prompt);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.needs_deep_analysis {
                println!("deep analysis recommended");
                for reason in &result.reasons {
                    println!("- {}", reason);
                }
            } else {
                println!("fast mode is enough");
            }
        }
        Command::Patterns { intent, mode } => {
            let mode = mode.unwrap_or(config.mode);
            let library = build_library(&config);
            let pipeline = library.applicable_patterns(
                "",
                &IntentResult::supplied(intent, ""),
                &QualityScore::zero(mode),
                mode,
            );

            println!("{} / {}:", intent, mode);
            for pattern in pipeline {
                println!(
                    "  {:>2}  {:<32} {}",
                    PatternLibrary::effective_priority(pattern, library.config()),
                    pattern.id(),
                    pattern.meta().description
                );
            }
        }
    }

    Ok(())
}
