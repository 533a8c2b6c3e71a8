//! Phone simulator console
//!
//! ```text
//! phonesim [--config phonesim.toml] [--log-level debug] [--phones 5]
//! ```

mod input;
mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use phonesim_core::{setup_logging, LoggingConfig, PhoneDirectory, SimulatorConfig};
use tokio::io::BufReader;
use tracing::info;

use crate::shell::Shell;

/// Simulate phones calling each other
#[derive(Parser, Debug)]
#[command(name = "phonesim", version, about = "Interactive phone call simulator")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Number of phones to generate at startup; overrides the config file
    #[arg(short, long)]
    phones: Option<usize>,
}

impl Args {
    fn into_config(self) -> Result<SimulatorConfig> {
        let mut config = match &self.config {
            Some(path) => SimulatorConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => SimulatorConfig::default(),
        };
        if let Some(level) = self.log_level {
            config = config.with_log_level(level);
        }
        if let Some(amount) = self.phones {
            config = config.with_initial_phones(amount);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;

    setup_logging(LoggingConfig::from_level_name(&config.log_level)?)
        .context("Failed to initialize logging")?;
    info!("Starting phonesim v{}", phonesim_core::VERSION);

    let directory = PhoneDirectory::new();
    if config.initial_phones > 0 {
        directory.generate(config.initial_phones)?;
    }

    let mut shell = Shell::new(
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
        directory,
        config,
    );
    shell.run().await?;

    info!("Exiting, pending conversations are dropped");
    Ok(())
}
