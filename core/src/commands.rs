//! Command knowledge table: which instruction mnemonics exist and what they do.

use anyhow::Context;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::i18n::DEFAULT_LOCALE;

const BUNDLED: &str = include_str!("../resources/inform_commands.json");

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandInfo {
    /// Syntax line shown next to the mnemonic.
    #[serde(default)]
    pub detail: String,
    /// Description per locale.
    #[serde(default)]
    pub description: FxHashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: IndexMap<String, CommandInfo>,
}

impl CommandTable {
    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(BUNDLED).context("bundled command table")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let commands = serde_json::from_str(json).context("invalid command table")?;
        Ok(Self { commands })
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.commands.contains_key(mnemonic)
    }

    pub fn get(&self, mnemonic: &str) -> Option<&CommandInfo> {
        self.commands.get(mnemonic)
    }

    pub fn detail(&self, mnemonic: &str) -> Option<&str> {
        self.get(mnemonic).map(|c| c.detail.as_str())
    }

    /// Description in `locale`, or in English when that locale has none.
    pub fn description(&self, mnemonic: &str, locale: &str) -> Option<&str> {
        let info = self.get(mnemonic)?;
        info.description
            .get(locale)
            .or_else(|| info.description.get(DEFAULT_LOCALE))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table_knows_common_commands() {
        let table = CommandTable::bundled().unwrap();
        for mnemonic in ["NOP", "MOVJ", "MOVL", "TIMER", "DOUT", "CALL", "END"] {
            assert!(table.contains(mnemonic), "{mnemonic}");
        }
        assert!(!table.contains("MOVX"));
        assert!(table.detail("TIMER").unwrap().contains("T="));
    }

    #[test]
    fn test_description_falls_back_to_english() {
        let table = CommandTable::from_json(
            r#"{"NOP": {"detail": "NOP", "description": {"en": "nothing"}}, "END": {}}"#,
        )
        .unwrap();
        assert_eq!(table.description("NOP", "ja"), Some("nothing"));
        assert_eq!(table.description("END", "en"), None);
        assert_eq!(table.detail("END"), Some(""));
        assert_eq!(table.description("MOVJ", "en"), None);
    }
}
