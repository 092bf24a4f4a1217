//! Conversions between core results and protocol types.

use std::collections::HashMap;
use std::path::PathBuf;

use inform_core::types as core;
use serde_json::json;
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CompletionItem, CompletionItemKind, Diagnostic, DiagnosticSeverity, FoldingRange,
    FoldingRangeKind, Location, NumberOrString, Position, Range, TextEdit, WorkspaceEdit,
};
use url::Url;

pub(crate) const DIAGNOSTIC_SOURCE: &str = "inform";

pub(crate) fn uri_to_path(uri: &Url) -> Option<PathBuf> {
    uri.to_file_path().ok()
}

pub(crate) fn path_to_uri(path: &std::path::Path) -> Option<Url> {
    Url::from_file_path(path).ok()
}

pub(crate) fn position(pos: core::Position) -> Position {
    Position::new(pos.line, pos.character)
}

pub(crate) fn core_position(pos: Position) -> core::Position {
    core::Position::new(pos.line, pos.character)
}

pub(crate) fn range(range: core::TextRange) -> Range {
    Range::new(position(range.start), position(range.end))
}

pub(crate) fn core_range(range: Range) -> core::TextRange {
    core::TextRange::new(core_position(range.start), core_position(range.end))
}

pub(crate) fn severity(severity: core::Severity) -> DiagnosticSeverity {
    match severity {
        core::Severity::Error => DiagnosticSeverity::ERROR,
        core::Severity::Warning => DiagnosticSeverity::WARNING,
        core::Severity::Information => DiagnosticSeverity::INFORMATION,
        core::Severity::Hint => DiagnosticSeverity::HINT,
    }
}

/// The replacement text travels in `data` so a later code action can offer it.
pub(crate) fn diagnostic(finding: &core::Finding) -> Diagnostic {
    Diagnostic {
        range: range(finding.range),
        severity: Some(severity(finding.severity)),
        code: Some(NumberOrString::String(finding.code.to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: finding.message.clone(),
        data: finding.fix.as_ref().map(|fix| json!({ "fix": fix })),
        ..Default::default()
    }
}

/// Replacement text carried by a diagnostic we published.
pub(crate) fn fix_of(diagnostic: &Diagnostic) -> Option<String> {
    diagnostic
        .data
        .as_ref()?
        .get("fix")?
        .as_str()
        .map(str::to_string)
}

pub(crate) fn location(location: &core::Location) -> Option<Location> {
    Some(Location::new(path_to_uri(&location.path)?, range(location.range)))
}

pub(crate) fn folding_range(fold: core::FoldRange) -> FoldingRange {
    FoldingRange {
        start_line: fold.start_line,
        end_line: fold.end_line,
        kind: Some(FoldingRangeKind::Region),
        ..Default::default()
    }
}

pub(crate) fn completion_item(entry: core::CompletionEntry) -> CompletionItem {
    CompletionItem {
        label: entry.label,
        kind: Some(CompletionItemKind::FILE),
        ..Default::default()
    }
}

pub(crate) fn code_action(fix: core::QuickFix, diagnostics: Vec<Diagnostic>) -> Option<CodeAction> {
    let uri = path_to_uri(&fix.path)?;
    let edit = TextEdit::new(range(fix.range), fix.new_text);
    Some(CodeAction {
        title: fix.title,
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(diagnostics),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri, vec![edit])])),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_survives_the_round_trip() {
        let finding = core::Finding::new(
            core::Severity::Information,
            core::TextRange::on_line(3, 0, 5),
            "duplicate-name",
            "'GRIP1' is also used as a variable name.".to_string(),
        )
        .with_fix("'GRIP1".to_string());

        let diag = diagnostic(&finding);
        assert_eq!(diag.severity, Some(DiagnosticSeverity::INFORMATION));
        assert_eq!(diag.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
        assert_eq!(diag.range, Range::new(Position::new(3, 0), Position::new(3, 5)));
        assert_eq!(fix_of(&diag).as_deref(), Some("'GRIP1"));
        assert_eq!(core_range(diag.range), finding.range);
    }

    #[test]
    fn test_diagnostic_without_fix_has_no_data() {
        let finding = core::Finding::new(
            core::Severity::Warning,
            core::TextRange::on_line(0, 0, 3),
            "unknown-command",
            "Unknown command.".to_string(),
        );
        let diag = diagnostic(&finding);
        assert!(diag.data.is_none());
        assert!(fix_of(&diag).is_none());
    }
}
