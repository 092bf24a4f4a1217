use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use inform_core::{Services, Workspace};
use tower_lsp::Client;
use tracing::error;

use super::config::ServerConfig;
use super::store::OpenDocuments;

/// Files waiting for the next debounced validation pass.
#[derive(Debug, Default)]
pub(crate) struct PendingValidation {
    pub(crate) paths: Mutex<BTreeSet<PathBuf>>,
    /// Bumped on every scheduling; only the newest timer runs the pass.
    pub(crate) seq: AtomicU64,
}

/// Primary LSP server state shared across handlers.
pub(crate) struct InformLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<OpenDocuments>,
    pub(crate) workspace: Arc<Workspace>,
    pub(crate) config: Mutex<ServerConfig>,
    pub(crate) pending: Arc<PendingValidation>,
}

impl InformLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        let services = Services::bundled().unwrap_or_else(|err| {
            error!("failed to load bundled reference data: {err:#}");
            Services::default()
        });
        let documents = Arc::new(OpenDocuments::new());
        Self {
            client,
            workspace: Arc::new(Workspace::new(documents.clone(), Arc::new(services))),
            documents,
            config: Mutex::new(ServerConfig::default()),
            pending: Arc::new(PendingValidation::default()),
        }
    }
}
