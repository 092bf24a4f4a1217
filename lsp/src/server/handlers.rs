use inform_core::TextRange;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info};

use super::convert::{
    code_action, completion_item, core_position, core_range, fix_of, folding_range, location, path_to_uri, uri_to_path,
};
use super::state::InformLanguageServer;
use super::text::apply_change;

const SERVER_NAME: &str = "Inform Language Server";

#[tower_lsp::async_trait]
impl LanguageServer for InformLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("{SERVER_NAME} initializing with root {:?}", params.root_uri);
        if let Ok(mut config) = self.config.lock() {
            config.client_locale = params.locale.clone();
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                })),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![":".to_string()]),
                    ..Default::default()
                }),
                code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
                    code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                    ..Default::default()
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("{SERVER_NAME} initialized");
        self.client
            .log_message(MessageType::INFO, format!("{SERVER_NAME} started"))
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("{SERVER_NAME} shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _: DidChangeConfigurationParams) {
        self.workspace.settings().clear_documents();
        self.workspace.reset();
        self.load_config().await;
        for path in self.documents.paths() {
            if let Some(uri) = path_to_uri(&path) {
                self.load_document_config(&uri).await;
            }
        }
        self.revalidate_all().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let Some(path) = uri_to_path(&doc.uri) else {
            debug!("ignoring non-file document {}", doc.uri);
            return;
        };
        self.documents.open(path.clone(), &doc.text, doc.version);
        self.workspace.invalidate(&path);
        self.load_document_config(&doc.uri).await;
        self.publish_now(&path).await;
        if let Some(dir) = path.parent() {
            self.schedule_validation(dir);
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some(path) = uri_to_path(&params.text_document.uri) else {
            return;
        };
        let changed = {
            let Some(mut doc) = self.documents.get_mut(&path) else {
                return;
            };
            doc.version = params.text_document.version;
            for change in &params.content_changes {
                apply_change(&mut doc.content, change);
            }
            doc.refresh()
        };
        if !changed {
            return;
        }
        self.workspace.invalidate(&path);
        if let Some(dir) = path.parent() {
            self.schedule_validation(dir);
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        // siblings that are not open read the saved text from disk
        if let Some(path) = uri_to_path(&params.text_document.uri) {
            if let Some(dir) = path.parent() {
                self.schedule_validation(dir);
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(path) = uri_to_path(&uri) {
            self.documents.close(&path);
            self.workspace.invalidate(&path);
            self.workspace.settings().remove_document(&path);
            if let Some(dir) = path.parent() {
                self.schedule_validation(dir);
            }
        }
        self.clear_diagnostics(uri).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position = params.text_document_position_params;
        let Some(path) = uri_to_path(&position.text_document.uri) else {
            return Ok(None);
        };
        let hover = self
            .workspace
            .hover(&path, core_position(position.position))
            .map(|value| Hover {
                contents: HoverContents::Markup(MarkupContent {
                    kind: MarkupKind::PlainText,
                    value,
                }),
                range: None,
            });
        Ok(hover)
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let position = params.text_document_position_params;
        let Some(path) = uri_to_path(&position.text_document.uri) else {
            return Ok(None);
        };
        let target = self
            .workspace
            .definition(&path, core_position(position.position))
            .and_then(|target| location(&target));
        Ok(target.map(GotoDefinitionResponse::Scalar))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let Some(path) = uri_to_path(&params.text_document.uri) else {
            return Ok(None);
        };
        let folds = self.workspace.folding_ranges(&path);
        Ok(Some(folds.into_iter().map(folding_range).collect()))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        let Some(path) = uri_to_path(&position.text_document.uri) else {
            return Ok(None);
        };
        let items = self
            .workspace
            .completion(&path, core_position(position.position))
            .map(|entries| CompletionResponse::Array(entries.into_iter().map(completion_item).collect()));
        Ok(items)
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let Some(path) = uri_to_path(&params.text_document.uri) else {
            return Ok(None);
        };
        let only_quickfix = params
            .context
            .only
            .as_ref()
            .and_then(|only| only.first())
            .is_some_and(|kind| *kind == CodeActionKind::QUICKFIX);

        let carried: Vec<(&Diagnostic, TextRange, String)> = params
            .context
            .diagnostics
            .iter()
            .filter_map(|diag| Some((diag, core_range(diag.range), fix_of(diag)?)))
            .collect();
        let requests: Vec<(TextRange, String)> = carried
            .iter()
            .map(|(_, range, fix)| (*range, fix.clone()))
            .collect();

        let fixes = self.workspace.code_actions(&path, only_quickfix, &requests);
        let actions: Vec<CodeActionOrCommand> = fixes
            .into_iter()
            .filter_map(|fix| {
                let diagnostics = carried
                    .iter()
                    .filter(|(_, range, _)| *range == fix.range)
                    .map(|(diag, _, _)| (*diag).clone())
                    .collect();
                code_action(fix, diagnostics)
            })
            .map(CodeActionOrCommand::CodeAction)
            .collect();

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }
}
