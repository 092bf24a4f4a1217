use std::path::{Path, PathBuf};
use std::sync::RwLock;

use dashmap::DashMap;

use crate::i18n::DEFAULT_LOCALE;
use crate::types::Severity;

pub const DEFAULT_MAX_PROBLEMS: usize = 1000;

/// Effective settings of one file, resolved from the client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub locale: String,
    /// Severity of unknown-command findings; `None` disables the check.
    pub unknown_commands: Option<Severity>,
    pub max_problems: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            unknown_commands: None,
            max_problems: DEFAULT_MAX_PROBLEMS,
        }
    }
}

impl Settings {
    pub fn with_unknown_commands(mut self, level: Option<Severity>) -> Self {
        self.unknown_commands = level;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

/// Workspace-wide settings plus per-document overrides.
#[derive(Debug, Default)]
pub struct SettingsStore {
    global: RwLock<Settings>,
    documents: DashMap<PathBuf, Settings>,
}

impl SettingsStore {
    pub fn new(global: Settings) -> Self {
        Self {
            global: RwLock::new(global),
            documents: DashMap::new(),
        }
    }

    /// Settings that apply to `path`: its own when known, the global ones otherwise.
    pub fn resolve(&self, path: &Path) -> Settings {
        if let Some(settings) = self.documents.get(path) {
            return settings.clone();
        }
        self.global()
    }

    pub fn global(&self) -> Settings {
        self.global.read().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn set_global(&self, settings: Settings) {
        if let Ok(mut global) = self.global.write() {
            *global = settings;
        }
    }

    pub fn set_document(&self, path: impl Into<PathBuf>, settings: Settings) {
        self.documents.insert(path.into(), settings);
    }

    pub fn remove_document(&self, path: &Path) {
        self.documents.remove(path);
    }

    pub fn clear_documents(&self) {
        self.documents.clear();
    }
}
