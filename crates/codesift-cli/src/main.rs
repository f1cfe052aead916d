//! Codesift CLI - Command line interface for code search

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use codesift_core::config::{default_config_path, Config};
use codesift_index::{IndexStore, TrigramIndex};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod output;

use commands::{completions, config, find, grep, index, search, serve};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "codesift")]
#[command(author, version, about = "Regex code search and fuzzy file navigation")]
pub struct Cli {
    /// Config file
    #[arg(short, long, global = true, env = "CODESIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Index file (overrides the config file)
    #[arg(long, global = true, env = "CODESIFT_INDEX")]
    pub index: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Config file contents with global flag overrides applied
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load_from(&self.config_path())?;
        if let Some(index) = &self.index {
            config.index_path = index.clone();
        }
        Ok(config)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.format.as_str())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the index from the configured roots
    Index(index::IndexArgs),
    /// Search file contents with a regular expression
    Search(search::SearchArgs),
    /// Fuzzy find indexed file paths
    Find(find::FindArgs),
    /// Print matching lines of one or more files
    Grep(grep::GrepArgs),
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Manage configuration
    Config(config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load the stored index named by `config`
pub fn load_index(config: &Config) -> anyhow::Result<TrigramIndex> {
    let store = IndexStore::new(&config.index_path);
    if !store.exists() {
        anyhow::bail!(
            "No index at {}. Run `codesift index` first.",
            store.path().display()
        );
    }
    store
        .load()
        .with_context(|| format!("Failed to load index {}", store.path().display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting codesift CLI");

    match &cli.command {
        Commands::Index(args) => index::run(args, &cli)?,
        Commands::Search(args) => search::run(args, &cli)?,
        Commands::Find(args) => find::run(args, &cli)?,
        Commands::Grep(args) => grep::run(args, &cli)?,
        Commands::Serve(args) => serve::run(args, &cli).await?,
        Commands::Config(args) => config::run(args, &cli)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
