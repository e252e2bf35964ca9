//! Biblio Extract - journal to CSV tables

use anyhow::Context;
use biblio_common::logging::{init_logging, LogConfig, LogLevel};
use biblio_extract::{pipeline, Cli};
use clap::Parser;
use std::process;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env file is fine; the environment and flags still apply
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let defaults = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("biblio-extract")
        .filter_directives("hyper=warn,reqwest=warn")
        .build();

    // Environment variables take precedence over the flags
    let log_config = defaults.clone().merge_env().unwrap_or(defaults);

    let guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    let result = execute(&cli).await;

    if let Err(ref e) = result {
        error!(error = %format!("{:#}", e), "Extraction failed");
    }
    drop(guard);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.to_config().context("Invalid configuration")?;

    pipeline::run(&config)
        .await
        .with_context(|| format!("Extraction for ISSN {} failed", config.issn))?;

    Ok(())
}
