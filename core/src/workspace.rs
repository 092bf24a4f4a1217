//! The context object every request goes through.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::commands::CommandTable;
use crate::controller::Controller;
use crate::files::{FileContext, FileHandler, FileKind};
use crate::i18n::Translator;
use crate::settings::SettingsStore;
use crate::text::LineSource;
use crate::types::{CompletionEntry, Finding, FoldRange, Location, Position, QuickFix, TextRange};

/// Read-only reference data loaded once at startup.
#[derive(Debug, Default)]
pub struct Services {
    pub translator: Translator,
    pub commands: CommandTable,
}

impl Services {
    pub fn new(translator: Translator, commands: CommandTable) -> Self {
        Self { translator, commands }
    }

    pub fn bundled() -> anyhow::Result<Self> {
        Ok(Self::new(Translator::bundled()?, CommandTable::bundled()?))
    }
}

/// Registries of every controller directory seen so far, plus the text source
/// and settings they share.
pub struct Workspace {
    source: Arc<dyn LineSource>,
    services: Arc<Services>,
    settings: Arc<SettingsStore>,
    controllers: DashMap<PathBuf, Arc<Controller>>,
}

impl Workspace {
    pub fn new(source: Arc<dyn LineSource>, services: Arc<Services>) -> Self {
        Self {
            source,
            services,
            settings: Arc::new(SettingsStore::default()),
            controllers: DashMap::new(),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn source(&self) -> &dyn LineSource {
        self.source.as_ref()
    }

    /// The registry of the directory holding `path`.
    pub fn controller(&self, path: &Path) -> Arc<Controller> {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.controllers
            .entry(dir.clone())
            .or_insert_with(|| Arc::new(Controller::new(dir, self.source.clone(), self.settings.clone())))
            .clone()
    }

    /// Forgets the cached state of `path` only; its siblings keep theirs.
    pub fn invalidate(&self, path: &Path) -> bool {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let Some(controller) = self.controllers.get(&dir).map(|c| c.clone()) else {
            return false;
        };
        controller.evict(path)
    }

    /// Drops every directory registry, e.g. after a configuration change.
    pub fn reset(&self) {
        debug!("dropping {} controller registries", self.controllers.len());
        self.controllers.clear();
    }

    pub fn file_kind(&self, path: &Path) -> FileKind {
        FileKind::from_path(path)
    }

    fn with_file<R>(&self, path: &Path, f: impl FnOnce(&dyn FileHandler, &FileContext<'_>) -> R) -> R {
        let controller = self.controller(path);
        let file = controller.file(path);
        let cx = FileContext {
            controller: &controller,
            file: &file,
            services: &self.services,
        };
        f(file.kind().handler(), &cx)
    }

    pub fn hover(&self, path: &Path, pos: Position) -> Option<String> {
        self.with_file(path, |handler, cx| handler.hover(cx, pos))
    }

    pub fn definition(&self, path: &Path, pos: Position) -> Option<Location> {
        self.with_file(path, |handler, cx| handler.definition(cx, pos))
    }

    pub fn folding_ranges(&self, path: &Path) -> Vec<FoldRange> {
        self.with_file(path, |handler, cx| handler.folding_ranges(cx))
    }

    pub fn completion(&self, path: &Path, pos: Position) -> Option<Vec<CompletionEntry>> {
        self.with_file(path, |handler, cx| handler.completion(cx, pos))
    }

    /// Findings for `path`, capped at the file's problem limit.
    pub fn validate(&self, path: &Path) -> Vec<Finding> {
        self.with_file(path, |handler, cx| {
            let mut findings = handler.validate(cx).unwrap_or_default();
            findings.truncate(cx.file.settings().max_problems);
            findings
        })
    }

    /// Quick fixes for findings that carried replacement text. Only requests
    /// scoped to quick fixes get any.
    pub fn code_actions(&self, path: &Path, only_quickfix: bool, requests: &[(TextRange, String)]) -> Vec<QuickFix> {
        if !only_quickfix {
            return Vec::new();
        }
        self.with_file(path, |handler, cx| handler.code_actions(cx, requests))
    }
}
