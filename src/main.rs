use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use authgate_options::{AlphaConfig, LegacyConfig};

#[derive(Parser, Debug)]
#[command(name = "authgate-options")]
#[command(about = "Migrate legacy proxy options to the structured configuration")]
#[command(version)]
struct Args {
    /// Path to the legacy configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Alpha configuration merged over the migrated options
    #[arg(long)]
    alpha_config: Option<PathBuf>,

    /// Print the alpha view of the migrated configuration and exit
    #[arg(long)]
    convert_config_to_alpha: bool,

    /// Validate the migrated configuration and exit
    #[arg(long)]
    validate: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Loading legacy configuration from {:?}", args.config);

    let legacy = LegacyConfig::load(&args.config)?;
    let migration = legacy.migrate()?;
    if !migration.warnings.is_empty() {
        warn!(
            "Legacy configuration migrated with {} warning(s)",
            migration.warnings.len()
        );
    }
    let mut config = migration.config;

    if args.convert_config_to_alpha {
        print!("{}", AlphaConfig::extract_from(&config).to_yaml()?);
        return Ok(());
    }

    if let Some(path) = &args.alpha_config {
        info!("Merging alpha configuration from {:?}", path);
        AlphaConfig::load(path)?.merge_into(&mut config);
    }

    config.validate()?;

    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    print!("{}", config.to_yaml()?);

    Ok(())
}
