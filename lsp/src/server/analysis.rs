use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use inform_core::Workspace;
use tokio::task;
use tokio::time::{sleep, Duration};
use tower_lsp::lsp_types::{Diagnostic, Url};
use tower_lsp::Client;
use tracing::{debug, warn};

use super::convert::{diagnostic, path_to_uri};
use super::state::{InformLanguageServer, PendingValidation};
use super::store::OpenDocuments;

/// Validates one file off the async runtime.
pub(crate) async fn validate_path(workspace: Arc<Workspace>, path: PathBuf) -> Vec<Diagnostic> {
    let shown = path.display().to_string();
    match task::spawn_blocking(move || workspace.validate(&path)).await {
        Ok(findings) => findings.iter().map(diagnostic).collect(),
        Err(err) => {
            warn!("validation of {shown} failed: {err}");
            Vec::new()
        }
    }
}

async fn publish(client: &Client, documents: &OpenDocuments, workspace: Arc<Workspace>, path: PathBuf) {
    let Some(uri) = path_to_uri(&path) else {
        return;
    };
    let version = documents.version(&path);
    let diagnostics = validate_path(workspace, path).await;
    client.publish_diagnostics(uri, diagnostics, version).await;
}

impl InformLanguageServer {
    /// Validates and publishes one document right away.
    pub(crate) async fn publish_now(&self, path: &Path) {
        publish(&self.client, &self.documents, self.workspace.clone(), path.to_path_buf()).await;
    }

    pub(crate) async fn clear_diagnostics(&self, uri: Url) {
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    /// Queues every open document in `dir` and runs one pass once edits have
    /// been quiet for the configured delay.
    pub(crate) fn schedule_validation(&self, dir: &Path) {
        let queued = self.documents.paths_in(dir);
        if queued.is_empty() {
            return;
        }
        if let Ok(mut paths) = self.pending.paths.lock() {
            paths.extend(queued);
        }
        let seq = self.pending.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = Duration::from_millis(self.validation_delay_ms());

        let client = self.client.clone();
        let documents = self.documents.clone();
        let workspace = self.workspace.clone();
        let pending = self.pending.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            if pending.seq.load(Ordering::SeqCst) != seq {
                return;
            }
            let batch = take_pending(&pending);
            debug!("validating {} queued documents", batch.len());
            for path in batch {
                // closed while waiting
                if !documents.is_open(&path) {
                    continue;
                }
                publish(&client, &documents, workspace.clone(), path).await;
            }
        });
    }

    /// Re-validates every open document, e.g. after a configuration change.
    pub(crate) async fn revalidate_all(&self) {
        for path in self.documents.paths() {
            self.publish_now(&path).await;
        }
    }
}

fn take_pending(pending: &PendingValidation) -> Vec<PathBuf> {
    match pending.paths.lock() {
        Ok(mut paths) => std::mem::take(&mut *paths).into_iter().collect(),
        Err(_) => Vec::new(),
    }
}
