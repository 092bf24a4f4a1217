use std::fmt;

use rustc_hash::FxHashMap;

use super::columns::{field_index_at, field_span};
use crate::section::SectionedDocument;
use crate::text::{TextSnapshot, byte_span_range, column_to_byte};
use crate::types::{Lookup, Position, TextRange};

/// Values stored on each contents line of a parameter section.
pub const VALUES_PER_LINE: usize = 10;

/// A parameter slot such as `S2C395`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterAddress {
    pub kind: String,
    pub number: u32,
}

impl ParameterAddress {
    pub fn new(kind: impl Into<String>, number: u32) -> Self {
        Self {
            kind: kind.into(),
            number,
        }
    }

    pub fn line_offset(&self) -> usize {
        self.number as usize / VALUES_PER_LINE
    }

    pub fn column(&self) -> usize {
        self.number as usize % VALUES_PER_LINE
    }
}

impl fmt::Display for ParameterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.number)
    }
}

/// Address arithmetic over a parsed parameter file.
pub struct ParameterCodec<'a> {
    doc: &'a SectionedDocument,
    text: &'a TextSnapshot,
}

impl<'a> ParameterCodec<'a> {
    pub fn new(doc: &'a SectionedDocument, text: &'a TextSnapshot) -> Self {
        Self { doc, text }
    }

    /// Whether `address` lies inside the slots its section declares.
    pub fn exists(&self, address: &ParameterAddress) -> bool {
        self.doc
            .get(&address.kind)
            .is_some_and(|section| (address.number as usize) < section.contents.len() * VALUES_PER_LINE)
    }

    /// Line number and raw text of the value token for `address`.
    pub fn value_text(&self, address: &ParameterAddress) -> Option<(usize, &'a str)> {
        if !self.exists(address) {
            return None;
        }
        let section = self.doc.get(&address.kind)?;
        let line_no = section.contents.start + address.line_offset();
        let line = self.text.line(line_no)?;
        let span = field_span(line, address.column())?;
        Some((line_no, &line[span]))
    }

    /// Character range of the value token for `address`.
    pub fn range(&self, address: &ParameterAddress) -> Option<TextRange> {
        if !self.exists(address) {
            return None;
        }
        let section = self.doc.get(&address.kind)?;
        let line_no = section.contents.start + address.line_offset();
        let line = self.text.line(line_no)?;
        let span = field_span(line, address.column())?;
        Some(byte_span_range(line, line_no, span))
    }

    /// The slot under the cursor.
    pub fn address_at(&self, pos: Position) -> Option<ParameterAddress> {
        let line_no = pos.line as usize;
        let (name, section) = self.doc.section_at_line(line_no)?;
        let line = self.text.line(line_no)?;
        let column = field_index_at(line, column_to_byte(line, pos.character));
        let number = (line_no - section.contents.start) * VALUES_PER_LINE + column;
        Some(ParameterAddress::new(name, number as u32))
    }
}

/// Every parameter value of one file, built in a single pass.
#[derive(Debug, Clone, Default)]
pub struct ParameterValues {
    values: FxHashMap<(String, u32), f64>,
}

impl ParameterValues {
    pub fn build(doc: &SectionedDocument, text: &TextSnapshot) -> Self {
        let mut values = FxHashMap::default();
        for (name, section) in doc.iter() {
            for line_no in section.contents.start..section.contents.end {
                let Some(line) = text.line(line_no) else {
                    break;
                };
                let offset = line_no - section.contents.start;
                for (column, token) in line.split(',').take(VALUES_PER_LINE).enumerate() {
                    let number = (offset * VALUES_PER_LINE + column) as u32;
                    values.insert((name.to_string(), number), parse_value(token));
                }
            }
        }
        Self { values }
    }

    /// Value of `address`; a slot inside the declared range with no token reads as 0.
    pub fn lookup(&self, codec: &ParameterCodec<'_>, address: &ParameterAddress) -> Lookup<f64> {
        if !codec.exists(address) {
            return Lookup::OutOfRange;
        }
        let key = (address.kind.clone(), address.number);
        Lookup::Found(self.values.get(&key).copied().unwrap_or(0.0))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Values are kept as written, fractions included. Unparsable tokens read as 0.
fn parse_value(token: &str) -> f64 {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}
