use inform_core::i18n::{DEFAULT_LOCALE, resolve_locale};
use inform_core::settings::DEFAULT_MAX_PROBLEMS;
use inform_core::{Settings, Severity};
use serde::Deserialize;
use tower_lsp::lsp_types::ConfigurationItem;
use tracing::{debug, warn};
use url::Url;

use super::convert::uri_to_path;
use super::state::InformLanguageServer;

pub(crate) const CONFIG_SECTION: &str = "informLanguageServer";
pub(crate) const DEFAULT_VALIDATION_DELAY_MS: u64 = 5000;

/// Server-wide knobs that do not belong to a single file.
#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) validation_delay_ms: u64,
    /// Locale the client announced at initialization.
    pub(crate) client_locale: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            validation_delay_ms: DEFAULT_VALIDATION_DELAY_MS,
            client_locale: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InformConfigSection {
    #[serde(default)]
    pub(crate) locale: Option<String>,
    #[serde(default)]
    pub(crate) unknown_commands: UnknownCommandsConfig,
    #[serde(default)]
    pub(crate) validation: ValidationConfig,
    #[serde(default)]
    pub(crate) max_number_of_problems: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnknownCommandsConfig {
    #[serde(default)]
    pub(crate) diagnosis_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidationConfig {
    #[serde(default)]
    pub(crate) delay_ms: Option<u64>,
}

impl InformConfigSection {
    /// Parses a configuration value; anything malformed reads as all defaults.
    pub(crate) fn from_value(value: serde_json::Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|err| {
            warn!("ignoring malformed {CONFIG_SECTION} configuration: {err}");
            Self::default()
        })
    }

    /// File settings, falling back to the client locale and then to the default one.
    pub(crate) fn settings(&self, client_locale: Option<&str>) -> Settings {
        let locale = self
            .locale
            .as_deref()
            .or(client_locale)
            .map(resolve_locale)
            .unwrap_or(DEFAULT_LOCALE);
        let unknown_commands = self
            .unknown_commands
            .diagnosis_level
            .as_deref()
            .and_then(Severity::from_level);
        Settings {
            locale: locale.to_string(),
            unknown_commands,
            max_problems: self
                .max_number_of_problems
                .filter(|max| *max > 0)
                .unwrap_or(DEFAULT_MAX_PROBLEMS),
        }
    }
}

impl InformLanguageServer {
    async fn fetch_section(&self, scope_uri: Option<Url>) -> Option<InformConfigSection> {
        let items = vec![ConfigurationItem {
            scope_uri,
            section: Some(CONFIG_SECTION.to_string()),
        }];
        match self.client.configuration(items).await {
            Ok(values) => values.into_iter().next().map(InformConfigSection::from_value),
            Err(err) => {
                debug!("workspace/configuration failed: {err}");
                None
            }
        }
    }

    fn client_locale(&self) -> Option<String> {
        self.config.lock().ok().and_then(|c| c.client_locale.clone())
    }

    /// Loads the workspace-wide configuration.
    pub(crate) async fn load_config(&self) {
        let Some(section) = self.fetch_section(None).await else {
            return;
        };
        let settings = section.settings(self.client_locale().as_deref());
        debug!("workspace settings: {settings:?}");
        self.workspace.settings().set_global(settings);
        if let Ok(mut config) = self.config.lock() {
            config.validation_delay_ms = section.validation.delay_ms.unwrap_or(DEFAULT_VALIDATION_DELAY_MS);
        }
    }

    /// Loads the configuration scoped to one document. It applies to the file
    /// objects created after it resolves.
    pub(crate) async fn load_document_config(&self, uri: &Url) {
        let Some(path) = uri_to_path(uri) else {
            return;
        };
        let Some(section) = self.fetch_section(Some(uri.clone())).await else {
            return;
        };
        let settings = section.settings(self.client_locale().as_deref());
        self.workspace.settings().set_document(path.clone(), settings);
        self.workspace.invalidate(&path);
    }

    pub(crate) fn validation_delay_ms(&self) -> u64 {
        self.config
            .lock()
            .map(|c| c.validation_delay_ms)
            .unwrap_or(DEFAULT_VALIDATION_DELAY_MS)
    }
}
