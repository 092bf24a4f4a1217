//! Bundled message tables with `{0}`-style positional placeholders.

use std::fmt::Display;

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

pub const DEFAULT_LOCALE: &str = "en";
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "ja"];

const BUNDLED: [(&str, &str); 2] = [
    ("en", include_str!("../resources/lang/en.json")),
    ("ja", include_str!("../resources/lang/ja.json")),
];

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([0-9]+)\}").expect("placeholder pattern"));

pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Maps a requested locale onto a bundled one; `ja-JP` resolves to `ja`.
pub fn resolve_locale(requested: &str) -> &'static str {
    let lowered = requested.trim().to_ascii_lowercase();
    let primary = lowered.split(['-', '_']).next().unwrap_or_default();
    SUPPORTED_LOCALES
        .into_iter()
        .find(|l| *l == primary)
        .unwrap_or(DEFAULT_LOCALE)
}

/// Substitutes `{n}` with the n-th argument; unknown indices stay as written.
pub fn format_message(template: &str, args: &[&dyn Display]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map(|arg| arg.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[derive(Debug, Clone, Default)]
pub struct Translator {
    tables: FxHashMap<String, FxHashMap<String, String>>,
}

impl Translator {
    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(&BUNDLED)
    }

    /// Builds the tables from `(locale, json object)` pairs. Non-string values are skipped.
    pub fn from_json(sources: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut tables = FxHashMap::default();
        for (locale, json) in sources {
            let raw: FxHashMap<String, serde_json::Value> =
                serde_json::from_str(json).with_context(|| format!("invalid message table for locale '{locale}'"))?;
            let table = raw
                .into_iter()
                .filter_map(|(key, value)| value.as_str().map(|s| (key, s.to_string())))
                .collect();
            tables.insert(locale.to_string(), table);
        }
        Ok(Self { tables })
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.tables.get(locale)?.get(key).map(String::as_str)
    }

    /// Message for `key` in `locale`, falling back to English and then to the key itself.
    pub fn translate(&self, locale: &str, key: &str, args: &[&dyn Display]) -> String {
        match self.lookup(locale, key).or_else(|| self.lookup(DEFAULT_LOCALE, key)) {
            Some(template) => format_message(template, args),
            None => key.to_string(),
        }
    }

    pub fn has(&self, locale: &str, key: &str) -> bool {
        self.lookup(locale, key).is_some()
    }
}

/// A translator bound to one locale.
#[derive(Clone, Copy)]
pub struct Messages<'a> {
    translator: &'a Translator,
    locale: &'a str,
}

impl<'a> Messages<'a> {
    pub fn new(translator: &'a Translator, locale: &'a str) -> Self {
        Self { translator, locale }
    }

    pub fn locale(&self) -> &'a str {
        self.locale
    }

    pub fn tr(&self, key: &str, args: &[&dyn Display]) -> String {
        self.translator.translate(self.locale, key, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_positional_arguments() {
        assert_eq!(format_message("{0} is {1}, not {2}", &[&"S2C1", &5, &7]), "S2C1 is 5, not 7");
        assert_eq!(format_message("{1}{0}", &[&"a", &"b"]), "ba");
        assert_eq!(format_message("keep {3}", &[&1]), "keep {3}");
    }

    #[test]
    fn test_fallback_to_english_then_key() {
        let translator = Translator::from_json(&[
            ("en", r#"{"greeting": "hello {0}", "only.en": "english"}"#),
            ("ja", r#"{"greeting": "こんにちは {0}", "ignored": 3}"#),
        ])
        .unwrap();

        assert_eq!(translator.translate("ja", "greeting", &[&"robot"]), "こんにちは robot");
        assert_eq!(translator.translate("ja", "only.en", &[]), "english");
        assert_eq!(translator.translate("ja", "missing.key", &[]), "missing.key");
        assert!(!translator.has("ja", "ignored"));
    }

    #[test]
    fn test_resolve_locale() {
        assert_eq!(resolve_locale("ja"), "ja");
        assert_eq!(resolve_locale("ja-JP"), "ja");
        assert_eq!(resolve_locale("EN_us"), "en");
        assert_eq!(resolve_locale("fr"), DEFAULT_LOCALE);
        assert_eq!(resolve_locale(""), DEFAULT_LOCALE);
    }

    #[test]
    fn test_bundled_tables_cover_the_same_keys() {
        let translator = Translator::bundled().unwrap();
        let en = &translator.tables["en"];
        for key in en.keys() {
            assert!(translator.has("ja", key), "ja is missing {key}");
        }
    }
}
