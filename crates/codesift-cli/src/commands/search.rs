//! Search command

use clap::Args;
use codesift_core::ContentQuery;
use codesift_search::SearchPipeline;

use crate::output::{format_match, to_json, OutputFormat};
use crate::{load_index, Cli};

#[derive(Args)]
pub struct SearchArgs {
    /// Regular expression to search for
    pub query: String,

    /// Only search files whose path matches this regular expression
    #[arg(short = 'f', long, default_value = "")]
    pub filter: String,

    /// Print at most this many matches
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

pub fn run(args: &SearchArgs, cli: &Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    let index = load_index(&config)?;

    let query = ContentQuery::new(&args.query).with_file_filter(&args.filter);
    let outcome = SearchPipeline::new(&index).run(&query)?;

    let limit = args.limit.unwrap_or(usize::MAX);
    let matches: Vec<_> = outcome
        .matches
        .into_iter()
        .take(limit)
        .map(|m| match &config.strip_prefix {
            Some(prefix) => m.strip_path_prefix(prefix),
            None => m,
        })
        .collect();

    match cli.output_format() {
        OutputFormat::Json => println!(
            "{}",
            to_json(&serde_json::json!({
                "matches": matches,
                "stats": outcome.stats,
            }))?
        ),
        OutputFormat::Text => {
            for m in &matches {
                println!("{}", format_match(m, None));
            }
            if !cli.quiet {
                eprintln!(
                    "{} matches in {} files ({} candidates, {} false positives)",
                    outcome.stats.matches,
                    outcome.stats.files_matched,
                    outcome.stats.candidates,
                    outcome.stats.false_positives
                );
            }
        }
    }
    Ok(())
}
