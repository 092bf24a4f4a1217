use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use super::columns::field_index_at;
use super::parameter::VALUES_PER_LINE;
use crate::section::SectionedDocument;
use crate::text::{TextSnapshot, column_to_byte};
use crate::types::{Position, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarType {
    B,
    I,
    D,
    R,
    S,
    P,
    BP,
    EX,
}

impl VarType {
    pub const ALL: [VarType; 8] = [
        VarType::B,
        VarType::I,
        VarType::D,
        VarType::R,
        VarType::S,
        VarType::P,
        VarType::BP,
        VarType::EX,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VarType::B => "B",
            VarType::I => "I",
            VarType::D => "D",
            VarType::R => "R",
            VarType::S => "S",
            VarType::P => "P",
            VarType::BP => "BP",
            VarType::EX => "EX",
        }
    }

    /// Numeric types are stored ten values per line in VAR.DAT.
    pub fn is_columnar(self) -> bool {
        matches!(self, VarType::B | VarType::I | VarType::D | VarType::R)
    }

    /// Section key of this type inside a variable name table.
    pub fn name_section(self) -> String {
        format!("///{}", self.as_str())
    }
}

impl FromStr for VarType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableAddress {
    pub var_type: VarType,
    pub number: u32,
}

impl VariableAddress {
    pub fn new(var_type: VarType, number: u32) -> Self {
        Self { var_type, number }
    }
}

impl fmt::Display for VariableAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.var_type, self.number)
    }
}

/// `<number> <meta>,<meta>,<name>` rows of a variable name table.
static NAME_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s+[0-9]+,[0-9+]+,(.*)").expect("variable name row pattern"));

/// One parsed name row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarNameRow {
    pub name: String,
    pub line: usize,
    /// Byte offset where the name starts.
    pub name_start: usize,
}

impl VarNameRow {
    pub fn range(&self, text: &TextSnapshot) -> TextRange {
        let len = text.line(self.line).map(|l| l.encode_utf16().count()).unwrap_or(0);
        TextRange::on_line(self.line as u32, 0, len as u32)
    }

    /// The full row with its name prefixed by a quote.
    pub fn commented_out(&self, text: &TextSnapshot) -> Option<String> {
        let line = text.line(self.line)?;
        Some(format!("{}'{}", &line[..self.name_start], &line[self.name_start..]))
    }
}

fn parse_row(line: &str) -> Option<(u32, usize)> {
    let caps = NAME_ROW.captures(line)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    Some((number, caps.get(2)?.start()))
}

/// Per-type number to name map of a variable name file.
///
/// Each type section is read until its first row that does not match the row
/// grammar; the rest of that section is ignored.
#[derive(Debug, Clone, Default)]
pub struct VarNameTable {
    tables: IndexMap<VarType, BTreeMap<u32, VarNameRow>>,
}

impl VarNameTable {
    pub fn build(doc: &SectionedDocument, text: &TextSnapshot) -> Self {
        let mut tables = IndexMap::new();
        for var_type in VarType::ALL {
            let Some(section) = doc.get(&var_type.name_section()) else {
                continue;
            };
            let mut table = BTreeMap::new();
            for line_no in section.contents.start..section.contents.end {
                let Some((number, name_start)) = text.line(line_no).and_then(parse_row) else {
                    break;
                };
                let name = text.line(line_no).map(|l| l[name_start..].to_string()).unwrap_or_default();
                table.entry(number).or_insert(VarNameRow {
                    name,
                    line: line_no,
                    name_start,
                });
            }
            tables.insert(var_type, table);
        }
        Self { tables }
    }

    pub fn row(&self, address: VariableAddress) -> Option<&VarNameRow> {
        self.tables.get(&address.var_type)?.get(&address.number)
    }

    pub fn name(&self, address: VariableAddress) -> Option<&str> {
        self.row(address).map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableAddress, &VarNameRow)> {
        self.tables.iter().flat_map(|(var_type, table)| {
            table
                .iter()
                .map(move |(number, row)| (VariableAddress::new(*var_type, *number), row))
        })
    }

    pub fn name_counts(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for (_, row) in self.iter() {
            *counts.entry(row.name.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Slot under the cursor in a VAR.DAT value file: section type and index.
pub fn variable_data_slot_at(doc: &SectionedDocument, text: &TextSnapshot, pos: Position) -> Option<(String, usize)> {
    let line_no = pos.line as usize;
    let (name, section) = doc.section_at_line(line_no)?;
    let line = text.line(line_no)?;
    let offset = line_no - section.contents.start;
    let columnar = name.parse::<VarType>().map(VarType::is_columnar).unwrap_or(false);
    let index = if columnar {
        offset * VALUES_PER_LINE + field_index_at(line, column_to_byte(line, pos.character))
    } else {
        offset
    };
    Some((name.to_string(), index))
}
