use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use super::{cli::try_cli_check, state::InformLanguageServer};

pub async fn run() {
    let args: Vec<String> = std::env::args().collect();
    match try_cli_check(&args) {
        Ok(Some(output)) => {
            println!("{output}");
            return;
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("inform-lsp check error: {e:#}");
            std::process::exit(2);
        }
    }

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(InformLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
