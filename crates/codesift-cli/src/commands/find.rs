//! Find command

use clap::Args;
use codesift_core::{Corpus, TypeaheadQuery};
use codesift_index::CandidateIndex;
use codesift_search::TwoPhaseMatcher;

use crate::output::{to_json, OutputFormat};
use crate::{load_index, Cli};

#[derive(Args)]
pub struct FindArgs {
    /// Fuzzy path query
    pub query: String,

    /// Limit results (0 = server maximum)
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

pub fn run(args: &FindArgs, cli: &Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    let index = load_index(&config)?;
    let corpus = Corpus::from_paths_under(index.paths(), config.strip_prefix.as_deref());

    let query = TypeaheadQuery::new(&args.query).with_limit(args.limit);
    let found = TwoPhaseMatcher::new(&corpus).typeahead(&query)?;
    let paths: Vec<String> = found
        .candidates
        .iter()
        .map(|c| c.relative_path().to_string())
        .collect();

    match cli.output_format() {
        OutputFormat::Json => println!(
            "{}",
            to_json(&serde_json::json!({
                "paths": paths,
                "total_matches": found.total_matches,
            }))?
        ),
        OutputFormat::Text => {
            for path in &paths {
                println!("{}", path);
            }
        }
    }
    Ok(())
}
