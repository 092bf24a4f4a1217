use inform_core::settings::DEFAULT_MAX_PROBLEMS;
use inform_core::Severity;
use serde_json::json;

use super::config::InformConfigSection;

#[test]
fn test_full_section() {
    let section = InformConfigSection::from_value(json!({
        "locale": "ja-JP",
        "unknownCommands": { "diagnosisLevel": "warning" },
        "validation": { "delayMs": 250 },
        "maxNumberOfProblems": 20
    }));
    let settings = section.settings(None);
    assert_eq!(settings.locale, "ja");
    assert_eq!(settings.unknown_commands, Some(Severity::Warning));
    assert_eq!(settings.max_problems, 20);
    assert_eq!(section.validation.delay_ms, Some(250));
}

#[test]
fn test_defaults_and_fallbacks() {
    let settings = InformConfigSection::from_value(serde_json::Value::Null).settings(None);
    assert_eq!(settings.locale, "en");
    assert_eq!(settings.unknown_commands, None);
    assert_eq!(settings.max_problems, DEFAULT_MAX_PROBLEMS);

    // the client locale is used when the section names none
    let settings = InformConfigSection::from_value(json!({})).settings(Some("ja"));
    assert_eq!(settings.locale, "ja");

    // unsupported locales fall back to English
    let settings = InformConfigSection::from_value(json!({ "locale": "de" })).settings(Some("ja"));
    assert_eq!(settings.locale, "en");
}

#[test]
fn test_none_level_disables_unknown_commands() {
    let section = InformConfigSection::from_value(json!({ "unknownCommands": { "diagnosisLevel": "none" } }));
    assert_eq!(section.settings(None).unknown_commands, None);

    let section = InformConfigSection::from_value(json!({ "unknownCommands": { "diagnosisLevel": "Error" } }));
    assert_eq!(section.settings(None).unknown_commands, Some(Severity::Error));
}

#[test]
fn test_malformed_section_reads_as_defaults() {
    let section = InformConfigSection::from_value(json!({ "maxNumberOfProblems": "many" }));
    assert_eq!(section.settings(None).max_problems, DEFAULT_MAX_PROBLEMS);
    let section = InformConfigSection::from_value(json!({ "maxNumberOfProblems": 0 }));
    assert_eq!(section.settings(None).max_problems, DEFAULT_MAX_PROBLEMS);
}
