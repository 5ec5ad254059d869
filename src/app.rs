// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod generator;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs;

use self::cli::Cli;
use self::config::resolve_config;
use self::generator::generate;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logging(args.verbose);

    // 2. Preset auto-detection keys off the current folder name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 3. Resolve Configuration
    let config = resolve_config(args, project_name)?;

    // 4. Scan and render
    let generated = generate(&config)?;

    if config.to_stdout {
        print!("{}", generated.content);
        return Ok(());
    }

    // 5. Write
    if let Some(parent) = generated.filename.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory {:?}", parent))?;
        }
    }
    fs::write(&generated.filename, &generated.content)
        .context(format!("Failed to write {:?}", generated.filename))?;
    log::info!("Wrote {}", generated.filename.display());

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
