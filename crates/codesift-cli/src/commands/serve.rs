//! Serve command

use std::sync::Arc;

use clap::Args;
use codesift_web::AppState;

use crate::Cli;

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address (host:port)
    #[arg(short, long, env = "CODESIFT_LISTEN")]
    pub listen: Option<String>,

    /// Reuse the stored index instead of rebuilding it at startup
    #[arg(long)]
    pub skip_index: bool,

    /// Editor command template, e.g. "code --goto {path}:{line}"
    #[arg(long, env = "CODESIFT_EDITOR")]
    pub editor: Option<String>,
}

pub async fn run(args: &ServeArgs, cli: &Cli) -> anyhow::Result<()> {
    let mut config = cli.load_config()?;
    if let Some(listen) = &args.listen {
        config.listen = listen.clone();
    }
    if args.skip_index {
        config.skip_index = true;
    }
    if let Some(editor) = &args.editor {
        config.editor = Some(editor.clone());
    }

    let state = tokio::task::spawn_blocking(move || AppState::open(config)).await??;
    codesift_web::run_server(Arc::new(state)).await
}
