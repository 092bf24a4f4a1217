//! Cross-file diagnostics: name collisions between the I/O and variable name
//! tables, and parameter comparison lists checked against the parameter file.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::address::ParameterAddress;
use crate::controller::AliasFlags;
use crate::i18n::Messages;
use crate::types::{Finding, Lookup, Severity, TextRange};

/// Prefix marking a name as commented out.
pub const COMMENT_MARK: char = '\'';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTable {
    Io,
    Variable,
}

impl NameTable {
    pub fn other(self) -> Self {
        match self {
            NameTable::Io => NameTable::Variable,
            NameTable::Variable => NameTable::Io,
        }
    }

    fn own_flag(self, flags: AliasFlags) -> Option<bool> {
        match self {
            NameTable::Io => flags.io_names,
            NameTable::Variable => flags.var_names,
        }
    }

    /// Whether this table is checked at all: only an explicitly disabled alias skips it.
    pub fn is_checked(self, flags: AliasFlags) -> bool {
        self.own_flag(flags) != Some(false)
    }

    /// Whether the other table's names count as collisions: only when its alias is enabled.
    pub fn pairs_with_other(self, flags: AliasFlags) -> bool {
        self.other().own_flag(flags) == Some(true)
    }

    fn duplicated_key(self) -> &'static str {
        match self {
            NameTable::Io => "names.diagnostic.duplicated.io",
            NameTable::Variable => "names.diagnostic.duplicated.var",
        }
    }

    fn collides_key(self) -> &'static str {
        match self {
            NameTable::Io => "names.diagnostic.collides.io",
            NameTable::Variable => "names.diagnostic.collides.var",
        }
    }
}

/// One registered name with where it is and how to comment it out.
#[derive(Debug, Clone)]
pub struct NameEntry<'a> {
    pub name: &'a str,
    pub range: TextRange,
    pub fix: Option<String>,
}

/// Flags every occurrence whose name appears at least twice across the own
/// table and, when given, the paired table. Blank and commented-out names are
/// never flagged.
pub fn duplicate_names<'a>(
    table: NameTable,
    entries: impl IntoIterator<Item = NameEntry<'a>>,
    own_counts: &FxHashMap<String, usize>,
    paired_counts: Option<&FxHashMap<String, usize>>,
    messages: Messages<'_>,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for entry in entries {
        if entry.name.is_empty() || entry.name.starts_with(COMMENT_MARK) {
            continue;
        }
        let own = own_counts.get(entry.name).copied().unwrap_or(0);
        let paired = paired_counts
            .and_then(|counts| counts.get(entry.name).copied())
            .unwrap_or(0);
        if own == 0 || own + paired < 2 {
            continue;
        }
        let key = if own >= 2 {
            table.duplicated_key()
        } else {
            table.other().collides_key()
        };
        let finding = Finding::new(
            Severity::Information,
            entry.range,
            "duplicate-name",
            messages.tr(key, &[&entry.name]),
        );
        findings.push(match entry.fix {
            Some(fix) => finding.with_fix(fix),
            None => finding,
        });
    }
    findings
}

static PSC_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([^,\s]+)\s*,\s*([0-9]+)\s*,").expect("psc key pattern"));
static PSC_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^,\s]+)\s*,\s*([0-9]+)\s*,\s*(-?[0-9]+)").expect("psc entry pattern"));

/// Parameter cited by a `type,number,...` comparison line.
pub fn psc_address(line: &str) -> Option<ParameterAddress> {
    let caps = PSC_KEY.captures(line)?;
    Some(ParameterAddress::new(&caps[1], caps[2].parse().ok()?))
}

/// A `type,number,value` comparison entry and the byte span it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct PscEntry {
    pub address: ParameterAddress,
    pub value: f64,
    pub span: Range<usize>,
}

impl PscEntry {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = PSC_ENTRY.captures(line)?;
        Some(Self {
            address: ParameterAddress::new(&caps[1], caps[2].parse().ok()?),
            value: caps[3].parse().ok()?,
            span: caps.get(0)?.range(),
        })
    }

    /// Compares the entry with the parameter file's value.
    pub fn check(&self, expected: Lookup<f64>, range: TextRange, messages: Messages<'_>) -> Option<Finding> {
        let name = self.address.to_string();
        let finding = match expected {
            Lookup::SourceUnavailable => return None,
            Lookup::OutOfRange => Finding::new(
                Severity::Warning,
                range,
                "param-not-found",
                messages.tr("psc.diagnostic.paramNotFound", &[&name]),
            ),
            Lookup::Found(value) if value != self.value => Finding::new(
                Severity::Warning,
                range,
                "param-mismatch",
                messages.tr("psc.diagnostic.paramUnmatch", &[&name, &self.value, &value]),
            ),
            Lookup::Found(_) => Finding::new(
                Severity::Information,
                range,
                "param-match",
                messages.tr("psc.diagnostic.paramMatch", &[]),
            ),
        };
        Some(finding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translator;

    fn counts(names: &[&str]) -> FxHashMap<String, usize> {
        let mut map = FxHashMap::default();
        for name in names {
            *map.entry(name.to_string()).or_insert(0) += 1;
        }
        map
    }

    fn entry(name: &str, line: u32) -> NameEntry<'_> {
        NameEntry {
            name,
            range: TextRange::on_line(line, 0, name.len() as u32),
            fix: Some(format!("'{name}")),
        }
    }

    #[test]
    fn test_alias_flag_gating() {
        let unknown = AliasFlags::default();
        assert!(NameTable::Io.is_checked(unknown));
        assert!(!NameTable::Io.pairs_with_other(unknown));

        let flags = AliasFlags {
            io_names: Some(false),
            var_names: Some(true),
        };
        assert!(!NameTable::Io.is_checked(flags));
        assert!(NameTable::Variable.is_checked(flags));
        assert!(NameTable::Io.pairs_with_other(flags));
        assert!(!NameTable::Variable.pairs_with_other(flags));
    }

    #[test]
    fn test_duplicates_inside_one_table() {
        let translator = Translator::bundled().unwrap();
        let own = counts(&["GRIP1", "GRIP1", "DOOR", "'OLD", "'OLD"]);
        let entries = vec![entry("GRIP1", 0), entry("GRIP1", 1), entry("DOOR", 2), entry("'OLD", 3), entry("'OLD", 4)];

        let findings = duplicate_names(NameTable::Io, entries, &own, None, Messages::new(&translator, "en"));
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.severity == Severity::Information));
        assert_eq!(findings[0].fix.as_deref(), Some("'GRIP1"));
        assert!(findings[0].message.contains("I/O name table"));
    }

    #[test]
    fn test_collision_with_paired_table() {
        let translator = Translator::bundled().unwrap();
        let own = counts(&["GRIP1"]);
        let paired = counts(&["GRIP1"]);

        let findings = duplicate_names(
            NameTable::Variable,
            vec![entry("GRIP1", 5)],
            &own,
            Some(&paired),
            Messages::new(&translator, "en"),
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].range.start.line, 5);
        assert!(findings[0].message.contains("also used as an I/O name"));

        let findings = duplicate_names(NameTable::Variable, vec![entry("GRIP1", 5)], &own, None, Messages::new(&translator, "en"));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_psc_entry_outcomes() {
        let translator = Translator::bundled().unwrap();
        let messages = Messages::new(&translator, "en");
        let entry = PscEntry::parse("S2C,395,1").unwrap();
        assert_eq!(entry.address, ParameterAddress::new("S2C", 395));
        assert_eq!(entry.span, 0..9);

        let range = TextRange::on_line(0, 0, 9);
        let missing = entry.check(Lookup::OutOfRange, range, messages).unwrap();
        assert_eq!((missing.severity, missing.code), (Severity::Warning, "param-not-found"));
        let mismatch = entry.check(Lookup::Found(0.0), range, messages).unwrap();
        assert_eq!((mismatch.severity, mismatch.code), (Severity::Warning, "param-mismatch"));
        assert_eq!(mismatch.message, "S2C395 is 1, but ALL.PRM has 0.");
        let matched = entry.check(Lookup::Found(1.0), range, messages).unwrap();
        assert_eq!(matched.severity, Severity::Information);
        assert!(entry.check(Lookup::SourceUnavailable, range, messages).is_none());
    }

    #[test]
    fn test_psc_fractional_parameter_does_not_match() {
        let translator = Translator::bundled().unwrap();
        let messages = Messages::new(&translator, "en");
        let entry = PscEntry::parse("S1C,2,1").unwrap();
        let range = TextRange::on_line(0, 0, 7);

        let finding = entry.check(Lookup::Found(1.5), range, messages).unwrap();
        assert_eq!(finding.code, "param-mismatch");
        assert_eq!(finding.message, "S1C2 is 1, but ALL.PRM has 1.5.");
    }

    #[test]
    fn test_psc_lines() {
        assert_eq!(psc_address("  RS , 12 , 3"), Some(ParameterAddress::new("RS", 12)));
        assert!(psc_address("RS,x,3").is_none());
        assert_eq!(PscEntry::parse("S1C,2,-5").map(|e| e.value), Some(-5.0));
        assert!(PscEntry::parse("// header").is_none());
    }
}
