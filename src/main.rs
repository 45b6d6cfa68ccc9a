use std::path::PathBuf;

use clap::Parser;
use tower_lsp::{LspService, Server};

use symdef_lsp::Backend;
use symdef_lsp::config::PartialSettings;
use symdef_lsp::logging;

/// Go-to-definition for method calls, driven by a workspace symbol index.
#[derive(Debug, Parser)]
#[command(name = "symdef-lsp", version, about)]
struct Cli {
    /// Communicate over stdin/stdout (the only supported transport).
    #[arg(long)]
    stdio: bool,

    /// Extra TOML settings file, applied after the user and workspace files.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `symdef_lsp=trace`.  Overrides SYMDEF_LOG.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn load_overrides(path: Option<&PathBuf>) -> PartialSettings {
    let Some(path) = path else {
        return PartialSettings::default();
    };
    match PartialSettings::from_toml_file(path) {
        Ok(Some(layer)) => layer,
        Ok(None) => {
            tracing::warn!("config file {} not found", path.display());
            PartialSettings::default()
        }
        Err(e) => {
            tracing::error!("{e}");
            PartialSettings::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    let overrides = load_overrides(cli.config.as_ref());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting symdef-lsp");
    if !cli.stdio {
        tracing::debug!("no transport flag given, defaulting to stdio");
    }

    let (service, socket) = LspService::new(move |client| Backend::new(client, overrides));
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
}
