//! Config command for managing the config file

use clap::{Args, Subcommand};
use codesift_core::Config;

use crate::Cli;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a config value
    Get {
        /// Config key name
        key: String,
    },
    /// Set a config value (lists are comma separated)
    Set {
        /// Config key name
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
    /// Initialize default config file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, cli: &Cli) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => run_get(cli, key),
        ConfigCommands::Set { key, value } => run_set(cli, key, value),
        ConfigCommands::List => run_list(cli),
        ConfigCommands::Path => run_path(cli),
        ConfigCommands::Init { force } => run_init(cli, *force),
    }
}

fn run_get(cli: &Cli, key: &str) -> anyhow::Result<()> {
    if !Config::keys().contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}\nAvailable keys: {}",
            key,
            Config::keys().join(", ")
        );
    }
    let config = Config::load_from(&cli.config_path())?;
    println!("{}", config.get(key).unwrap_or_default());
    Ok(())
}

fn run_set(cli: &Cli, key: &str, value: &str) -> anyhow::Result<()> {
    let path = cli.config_path();
    let mut config = Config::load_from(&path)?;
    config.set(key, value)?;
    config.save_to(&path)?;
    println!("Set {} = {}", key, value);
    Ok(())
}

fn run_list(cli: &Cli) -> anyhow::Result<()> {
    let path = cli.config_path();
    let config = Config::load_from(&path)?;
    println!("Config file: {}", path.display());
    println!();
    for key in Config::keys() {
        let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
        println!("{} = {}", key, value);
    }
    Ok(())
}

fn run_path(cli: &Cli) -> anyhow::Result<()> {
    println!("{}", cli.config_path().display());
    Ok(())
}

fn run_init(cli: &Cli, force: bool) -> anyhow::Result<()> {
    let path = cli.config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    println!("Created config file at {}", path.display());
    Ok(())
}
