//! Grep command: line verification of individual files

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use codesift_search::{grep_file, SearchError};
use regex::bytes::Regex;

use crate::output::{format_match, to_json, OutputFormat};
use crate::Cli;

#[derive(Args)]
pub struct GrepArgs {
    /// Regular expression to search for
    pub pattern: String,

    /// Files to search
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

pub fn run(args: &GrepArgs, cli: &Cli) -> anyhow::Result<()> {
    let regex = Regex::new(&args.pattern)
        .with_context(|| format!("Error compiling expression '{}'", args.pattern))?;

    let mut matches = Vec::new();
    for path in &args.paths {
        match grep_file(&regex, path) {
            Ok(found) => matches.extend(found),
            Err(SearchError::StaleIndexEntry { path }) => {
                anyhow::bail!("No such file: {}", path.display())
            }
            Err(e) => return Err(e.into()),
        }
    }

    match cli.output_format() {
        OutputFormat::Json => println!("{}", to_json(&matches)?),
        OutputFormat::Text => {
            for m in &matches {
                println!("{}", format_match(m, Some("#")));
            }
        }
    }
    Ok(())
}
