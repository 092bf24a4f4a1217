//! Token scanning over job program lines.
//!
//! Each scanner is an independent regular expression run over one line. Cursor
//! requests pick the first scanner, in a caller-given order, whose match covers
//! the cursor column. Word boundaries are ASCII-only, so kana next to an
//! operand does not hide it.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::address::{IoAddress, IoBank, VarType, VariableAddress};
use crate::commands::CommandTable;
use crate::i18n::Messages;
use crate::section::SectionedDocument;
use crate::text::{TextSnapshot, byte_span_range};
use crate::types::{Finding, Position, Severity, TextRange};

pub const INST_SECTION: &str = "INST";
pub const POS_SECTION: &str = "POS";

/// Largest timer value the controller accepts, in seconds.
pub const TIMER_MAX: f64 = 655.35;
/// Above this value timers lose their third decimal.
pub const TIMER_FINE_MAX: f64 = 65.535;

static JOB_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\sJOB:(\S+)").expect("job pattern"));
static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\S{1,8}(?-u:\b)").expect("label pattern"));
static CVARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"C([0-9]+)\s").expect("c-variable pattern"));
static IO_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?-u:\b)(IN|OT)#\(([0-9]+)\)").expect("io pattern"));
static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:ARGF|(?-u:\b))(BP|EX|B|I|D|R|S|P)([0-9]+)(?-u:\b)").expect("variable pattern"));
static COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:EDTLCK\s+)?(?:COMM\s+)?(?:\t*|\t\s*))([A-Z0-9]+\$?)(?:\s|$)").expect("command pattern")
});
static TIMER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s(?P<tag>T=(-?[0-9]+(?:\.([0-9]+))?))(?-u:\b)").expect("timer pattern"));
static JOB_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\sJOB(:\S*)").expect("job tag pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Job,
    Label,
    CVariable,
    Io,
    Variable,
    Command,
}

pub const DEFINITION_ORDER: [TokenKind; 5] = [
    TokenKind::Job,
    TokenKind::Label,
    TokenKind::CVariable,
    TokenKind::Io,
    TokenKind::Variable,
];

pub const HOVER_ORDER: [TokenKind; 3] = [TokenKind::Command, TokenKind::Variable, TokenKind::Io];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramRef {
    Job(String),
    Label(String),
    CVariable(u32),
    Io(IoAddress),
    Variable(VariableAddress),
    Command(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramToken {
    pub reference: ProgramRef,
    pub range: TextRange,
}

impl ProgramToken {
    pub fn kind(&self) -> TokenKind {
        match self.reference {
            ProgramRef::Job(_) => TokenKind::Job,
            ProgramRef::Label(_) => TokenKind::Label,
            ProgramRef::CVariable(_) => TokenKind::CVariable,
            ProgramRef::Io(_) => TokenKind::Io,
            ProgramRef::Variable(_) => TokenKind::Variable,
            ProgramRef::Command(_) => TokenKind::Command,
        }
    }

    /// Whether the cursor lies on the token. Operand matches include the
    /// column right after their last character; the command token does not.
    pub fn covers(&self, pos: Position) -> bool {
        if pos.line != self.range.start.line {
            return false;
        }
        match self.kind() {
            TokenKind::Command => self.range.contains(pos),
            _ => self.range.start.character <= pos.character && pos.character <= self.range.end.character,
        }
    }
}

fn preceded_by_whitespace(line: &str, byte: usize) -> bool {
    line[..byte].chars().next_back().is_some_and(char::is_whitespace)
}

/// Every match of one scanner on `line`.
pub fn scan(kind: TokenKind, line: &str, line_no: usize) -> Vec<ProgramToken> {
    let token = |reference: ProgramRef, span: Range<usize>| ProgramToken {
        reference,
        range: byte_span_range(line, line_no, span),
    };
    match kind {
        TokenKind::Job => JOB_NAME
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| token(ProgramRef::Job(m.as_str().to_string()), m.range()))
            .collect(),
        TokenKind::Label => LABEL
            .find_iter(line)
            .filter(|m| preceded_by_whitespace(line, m.start()))
            .map(|m| token(ProgramRef::Label(m.as_str().to_string()), m.range()))
            .collect(),
        TokenKind::CVariable => CVARIABLE
            .captures_iter(line)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if !preceded_by_whitespace(line, whole.start()) {
                    return None;
                }
                let number = caps[1].parse().ok()?;
                Some(token(ProgramRef::CVariable(number), whole.range()))
            })
            .collect(),
        TokenKind::Io => IO_VALUE
            .captures_iter(line)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let bank = IoBank::from_job_prefix(&caps[1])?;
                let address = IoAddress::from_sequential(bank, caps[2].parse().ok()?)?;
                Some(token(ProgramRef::Io(address), whole.range()))
            })
            .collect(),
        TokenKind::Variable => VARIABLE
            .captures_iter(line)
            .filter_map(|caps| {
                let var_type: VarType = caps[1].parse().ok()?;
                let number = caps[2].parse().ok()?;
                let span = caps.get(1)?.start()..caps.get(2)?.end();
                Some(token(ProgramRef::Variable(VariableAddress::new(var_type, number)), span))
            })
            .collect(),
        TokenKind::Command => command_token(line, line_no).into_iter().collect(),
    }
}

/// The instruction mnemonic at the start of an instruction line.
pub fn command_token(line: &str, line_no: usize) -> Option<ProgramToken> {
    let caps = COMMAND.captures(line)?;
    let name = caps.get(2)?;
    Some(ProgramToken {
        reference: ProgramRef::Command(name.as_str().to_string()),
        range: byte_span_range(line, line_no, name.range()),
    })
}

/// First token under the cursor, trying scanners in `order`.
pub fn token_at(line: &str, pos: Position, order: &[TokenKind]) -> Option<ProgramToken> {
    order
        .iter()
        .find_map(|kind| scan(*kind, line, pos.line as usize).into_iter().find(|t| t.covers(pos)))
}

/// Whether the cursor is inside the `:name` part of a `JOB:` tag.
pub fn job_tag_at(line: &str, character: u32) -> bool {
    JOB_TAG.captures_iter(line).filter_map(|caps| caps.get(1)).any(|m| {
        let range = byte_span_range(line, 0, m.range());
        range.start.character <= character && character <= range.end.character
    })
}

/// First line in the INST contents that starts with `label`.
pub fn label_range(doc: &SectionedDocument, text: &TextSnapshot, label: &str) -> Option<TextRange> {
    let section = doc.get(INST_SECTION)?;
    let pattern = Regex::new(&format!(r"^\s*(?P<hit>{})(?-u:\b)", regex::escape(label))).ok()?;
    text.search(&pattern, section.contents.start..section.contents.end)
}

/// The POS line that defines C-variable `number`.
pub fn cvariable_range(doc: &SectionedDocument, text: &TextSnapshot, number: u32) -> Option<TextRange> {
    let section = doc.get(POS_SECTION)?;
    let pattern = Regex::new(&format!(r"^C0*{number}(?-u:\b).*")).ok()?;
    text.search(&pattern, section.contents.start..section.contents.end)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerIssue {
    /// Outside `[0, 655.35]`.
    OutOfRange,
    /// Above 65.535, where the controller only keeps two decimals.
    CoarseRange,
    /// Three or more decimals written.
    CoarseDecimal,
}

impl TimerIssue {
    pub fn severity(self) -> Severity {
        match self {
            TimerIssue::OutOfRange => Severity::Error,
            TimerIssue::CoarseRange | TimerIssue::CoarseDecimal => Severity::Information,
        }
    }

    fn message_key(self) -> &'static str {
        match self {
            TimerIssue::OutOfRange => "program.diagnostic.timer.outOfRange",
            TimerIssue::CoarseRange => "program.diagnostic.timer.coarseRange",
            TimerIssue::CoarseDecimal => "program.diagnostic.timer.coarseDecimal",
        }
    }

    fn code(self) -> &'static str {
        match self {
            TimerIssue::OutOfRange => "timer-range",
            TimerIssue::CoarseRange | TimerIssue::CoarseDecimal => "timer-precision",
        }
    }
}

/// A `T=<seconds>` tag on an instruction line.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerTag {
    pub range: TextRange,
    pub value: f64,
    pub decimals: usize,
}

impl TimerTag {
    pub fn find(line: &str, line_no: usize) -> Option<Self> {
        let caps = TIMER.captures(line)?;
        let tag = caps.name("tag")?;
        Some(Self {
            range: byte_span_range(line, line_no, tag.range()),
            value: caps[2].parse().ok()?,
            decimals: caps.get(3).map_or(0, |m| m.as_str().len()),
        })
    }

    pub fn issues(&self) -> Vec<TimerIssue> {
        let mut issues = Vec::new();
        if self.value < 0.0 || self.value > TIMER_MAX {
            issues.push(TimerIssue::OutOfRange);
        } else if self.value > TIMER_FINE_MAX {
            issues.push(TimerIssue::CoarseRange);
        }
        if self.decimals >= 3 {
            issues.push(TimerIssue::CoarseDecimal);
        }
        issues
    }
}

/// Checks one INST line: the command mnemonic and the timer tag.
pub fn validate_instruction(
    line: &str,
    line_no: usize,
    commands: &CommandTable,
    unknown_commands: Option<Severity>,
    messages: Messages<'_>,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    if let Some(severity) = unknown_commands {
        if let Some(token) = command_token(line, line_no) {
            if let ProgramRef::Command(name) = &token.reference {
                if !commands.contains(name) {
                    findings.push(Finding::new(
                        severity,
                        token.range,
                        "unknown-command",
                        messages.tr("program.diagnostic.command.unknown", &[]),
                    ));
                }
            }
        }
    }
    if let Some(tag) = TimerTag::find(line, line_no) {
        for issue in tag.issues() {
            findings.push(Finding::new(
                issue.severity(),
                tag.range,
                issue.code(),
                messages.tr(issue.message_key(), &[]),
            ));
        }
    }
    findings
}
