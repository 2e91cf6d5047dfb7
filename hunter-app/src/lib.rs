//! Profile Hunter command-line shell
//!
//! Thin entry point that loads configuration, wires the browser engine and
//! summarizer into a [`Hunter`] and prints the result as JSON. Core logic
//! lives in the `crates/` directory.

use anyhow::{Context, Result};
use clap::Parser;
use hunter_browser::BrowserEngine;
use hunter_core::{AppConfig, IdentityQuery};
use hunter_pipeline::Hunter;
use std::sync::Arc;
use tracing::info;

/// Resolve a name, email and company to a professional profile.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "profile-hunter")]
#[command(about = "Find and score the professional profile of a person")]
#[command(version)]
pub struct Args {
    /// Full name of the person
    #[arg(value_parser = non_blank)]
    pub name: String,

    /// Email address, may be empty
    pub email: String,

    /// Current company, may be empty
    pub company: String,

    /// Print the full report instead of the flat result
    #[arg(long)]
    pub detailed: bool,
}

impl Args {
    /// The identity to resolve.
    #[must_use]
    pub fn query(&self) -> IdentityQuery {
        IdentityQuery::new(&self.name, &self.email, &self.company)
    }
}

fn non_blank(value: &str) -> std::result::Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

/// Initialize tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hunter=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run one hunt for `args` and print the JSON output.
pub async fn run(args: Args) -> Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load_with_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    info!(
        "Starting Profile Hunter v{} ({} search)",
        env!("CARGO_PKG_VERSION"),
        config.search.strategy
    );

    let engine = Arc::new(BrowserEngine::from_config(&config).context("failed to set up browser")?);
    let provider =
        hunter_llm::build_provider(&config.llm).context("failed to set up LLM provider")?;
    let hunter = Hunter::from_config(&config, engine, provider)?;

    let query = args.query();
    let output = if args.detailed {
        serde_json::to_string_pretty(&hunter.hunt_detailed_and_close(&query).await?)?
    } else {
        serde_json::to_string_pretty(&hunter.hunt_and_close(&query).await?)?
    };

    println!("{output}");
    Ok(())
}
