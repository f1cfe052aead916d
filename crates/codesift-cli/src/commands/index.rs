//! Index command

use std::path::PathBuf;

use clap::Args;
use codesift_index::IndexSnapshot;

use crate::output::{to_json, OutputFormat};
use crate::Cli;

#[derive(Args)]
pub struct IndexArgs {
    /// Roots to index (default: roots from the config file)
    pub roots: Vec<PathBuf>,

    /// Skip paths under this prefix (can be used multiple times)
    #[arg(long)]
    pub exclude: Vec<PathBuf>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    pub max_file_size: Option<u64>,
}

pub fn run(args: &IndexArgs, cli: &Cli) -> anyhow::Result<()> {
    let mut config = cli.load_config()?;
    if !args.roots.is_empty() {
        config.roots = args.roots.clone();
    }
    config.exclude.extend(args.exclude.iter().cloned());
    if let Some(size) = args.max_file_size {
        config.max_file_size = size;
    }
    if config.roots.is_empty() {
        anyhow::bail!(
            "No roots to index. Pass them as arguments or run `codesift config set roots <paths>`."
        );
    }

    let snapshot = IndexSnapshot::rebuild(&config)?;
    let index = snapshot.index();

    match cli.output_format() {
        OutputFormat::Json => println!(
            "{}",
            to_json(&serde_json::json!({
                "index_path": config.index_path,
                "files": index.files().len(),
                "trigrams": index.trigram_count(),
            }))?
        ),
        OutputFormat::Text => {
            if !cli.quiet {
                println!(
                    "Indexed {} files ({} trigrams) into {}",
                    index.files().len(),
                    index.trigram_count(),
                    config.index_path.display()
                );
            }
        }
    }
    Ok(())
}
