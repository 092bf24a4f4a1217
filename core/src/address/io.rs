use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;

use super::columns::{field_index_at, field_span};
use crate::section::SectionedDocument;
use crate::text::{TextSnapshot, byte_span_range, column_to_byte};
use crate::types::{Position, TextRange};

pub const NAMES_PER_LINE: u32 = 4;
pub const BITS_PER_GROUP: u32 = 8;
const BANK_SPAN: u32 = 10_000;
/// Highest group whose bits still fit below the next bank's offset.
pub const MAX_GROUP: u32 = (BANK_SPAN - 1) / 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IoBank {
    In,
    Out,
    ExIn,
    ExOut,
}

impl IoBank {
    pub const ALL: [IoBank; 4] = [IoBank::In, IoBank::Out, IoBank::ExIn, IoBank::ExOut];

    pub fn offset(self) -> u32 {
        match self {
            IoBank::In => 0,
            IoBank::Out => BANK_SPAN,
            IoBank::ExIn => 2 * BANK_SPAN,
            IoBank::ExOut => 3 * BANK_SPAN,
        }
    }

    /// Section name of the bank inside an I/O name table.
    pub fn section_name(self) -> &'static str {
        match self {
            IoBank::In => "IN",
            IoBank::Out => "OUT",
            IoBank::ExIn => "EXIN",
            IoBank::ExOut => "EXOUT",
        }
    }

    pub fn from_section_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bank| bank.section_name() == name)
    }

    /// Bank prefix used by job instructions (`IN#(n)`, `OT#(n)`).
    pub fn from_job_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "IN" => Some(IoBank::In),
            "OT" => Some(IoBank::Out),
            _ => None,
        }
    }

    fn from_offset(offset: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|bank| bank.offset() == offset)
    }
}

/// Flat logical I/O number: `bank offset + group * 10 + bit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IoAddress(u32);

impl IoAddress {
    pub fn new(bank: IoBank, group: u32, bit: u32) -> Option<Self> {
        if group == 0 || group > MAX_GROUP || bit >= BITS_PER_GROUP {
            return None;
        }
        Some(Self(bank.offset() + group * 10 + bit))
    }

    /// Validates a raw logical number such as `10023`.
    pub fn from_logical(number: u32) -> Option<Self> {
        let bank = IoBank::from_offset(number / BANK_SPAN * BANK_SPAN)?;
        let rest = number - bank.offset();
        Self::new(bank, rest / 10, rest % 10)
    }

    /// Address of the `name_index`-th name on contents line `line_offset` of a bank section.
    pub fn from_name_position(bank: IoBank, line_offset: u32, name_index: u32) -> Option<Self> {
        if name_index >= NAMES_PER_LINE {
            return None;
        }
        let index = line_offset.checked_mul(NAMES_PER_LINE)?.checked_add(name_index)?;
        Self::new(bank, index / BITS_PER_GROUP + 1, index % BITS_PER_GROUP)
    }

    /// Address of the 1-based sequential I/O number used by job instructions.
    pub fn from_sequential(bank: IoBank, number: u32) -> Option<Self> {
        let index = number.checked_sub(1)?;
        Self::new(bank, index / BITS_PER_GROUP + 1, index % BITS_PER_GROUP)
    }

    pub fn logical(self) -> u32 {
        self.0
    }

    pub fn bank(self) -> IoBank {
        // constructors only produce numbers below the EXOUT span
        IoBank::from_offset(self.0 / BANK_SPAN * BANK_SPAN).unwrap_or(IoBank::ExOut)
    }

    pub fn group(self) -> u32 {
        (self.0 - self.bank().offset()) / 10
    }

    pub fn bit(self) -> u32 {
        self.0 % 10
    }

    /// Contents line offset and name index inside the bank section.
    pub fn name_position(self) -> (u32, u32) {
        let line_offset = (self.group() - 1) * 2 + self.bit() / NAMES_PER_LINE;
        (line_offset, self.bit() % NAMES_PER_LINE)
    }

    pub fn sequential(self) -> u32 {
        (self.group() - 1) * BITS_PER_GROUP + self.bit() + 1
    }
}

impl fmt::Display for IoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:05}", self.0)
    }
}

/// A named bit in an I/O name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoName {
    pub name: String,
    pub range: TextRange,
}

/// Logical number to name map of one I/O name file. Blank names are not registered.
#[derive(Debug, Clone, Default)]
pub struct IoNameTable {
    names: BTreeMap<IoAddress, IoName>,
}

impl IoNameTable {
    pub fn build(doc: &SectionedDocument, text: &TextSnapshot) -> Self {
        let mut names = BTreeMap::new();
        for (section_name, section) in doc.iter() {
            let Some(bank) = IoBank::from_section_name(section_name) else {
                continue;
            };
            for line_no in section.contents.start..section.contents.end {
                let Some(line) = text.line(line_no) else {
                    break;
                };
                let offset = (line_no - section.contents.start) as u32;
                let mut start = 0usize;
                for (i, token) in line.split(',').enumerate() {
                    let span = start..start + token.len();
                    start = span.end + 1;
                    if token.is_empty() {
                        continue;
                    }
                    let Some(address) = IoAddress::from_name_position(bank, offset, i as u32) else {
                        continue;
                    };
                    names.insert(
                        address,
                        IoName {
                            name: token.to_string(),
                            range: byte_span_range(line, line_no, span),
                        },
                    );
                }
            }
        }
        Self { names }
    }

    pub fn name(&self, address: IoAddress) -> Option<&str> {
        self.names.get(&address).map(|n| n.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (IoAddress, &IoName)> {
        self.names.iter().map(|(a, n)| (*a, n))
    }

    pub fn name_counts(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for entry in self.names.values() {
            *counts.entry(entry.name.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Range of the name slot for `address`, recomputed from the address arithmetic.
pub fn io_name_range(doc: &SectionedDocument, text: &TextSnapshot, address: IoAddress) -> Option<TextRange> {
    let section = doc.get(address.bank().section_name())?;
    let (line_offset, index) = address.name_position();
    let line_no = section.contents.start + line_offset as usize;
    if !section.contents.contains(line_no) {
        return None;
    }
    let line = text.line(line_no)?;
    let span = field_span(line, index as usize)?;
    Some(byte_span_range(line, line_no, span))
}

/// Bank and 1-based sequential number of the name slot under the cursor.
pub fn io_slot_at(doc: &SectionedDocument, text: &TextSnapshot, pos: Position) -> Option<(String, u32)> {
    let line_no = pos.line as usize;
    let (name, section) = doc.section_at_line(line_no)?;
    let line = text.line(line_no)?;
    let index = field_index_at(line, column_to_byte(line, pos.character));
    let offset = line_no - section.contents.start;
    Some((name.to_string(), (offset * NAMES_PER_LINE as usize + index + 1) as u32))
}
