use indexmap::IndexMap;

use crate::types::FoldRange;

/// Half-open line range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty range positioned at `line`.
    pub fn at(line: usize) -> Self {
        Self { start: line, end: line }
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub header: LineRange,
    pub contents: LineRange,
}

impl Section {
    pub fn fold(&self) -> FoldRange {
        FoldRange {
            start_line: self.header.start as u32,
            end_line: self.contents.end.saturating_sub(1) as u32,
        }
    }
}

/// How a header line turns into a section name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionNaming {
    /// Leading markers are stripped: `//INST` names the section `INST`.
    Stripped,
    /// The markers stay part of the name: `///B` names the section `///B`.
    Verbatim,
}

/// Line-prefix grammar that decides which lines open sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderGrammar {
    pub marker: &'static str,
    pub naming: SectionNaming,
    /// Names that only close the running contents range.
    pub reserved: &'static [&'static str],
    /// Prefix of sub-label lines; they behave like reserved headers.
    pub sub_label: Option<&'static str>,
}

impl HeaderGrammar {
    pub const PROGRAM: Self = Self {
        marker: "//",
        naming: SectionNaming::Stripped,
        reserved: &[],
        sub_label: Some("///"),
    };

    pub const DATA: Self = Self {
        marker: "/",
        naming: SectionNaming::Stripped,
        reserved: &[],
        sub_label: None,
    };

    pub const PARAMETER: Self = Self {
        reserved: &["CRC"],
        ..Self::DATA
    };

    pub const IO_MODULE_NAME: Self = Self {
        reserved: &["NAME"],
        ..Self::DATA
    };

    pub const VERBATIM: Self = Self {
        naming: SectionNaming::Verbatim,
        ..Self::DATA
    };

    fn classify<'a>(&self, line: &'a str) -> HeaderLine<'a> {
        if !line.starts_with(self.marker) {
            return HeaderLine::Body;
        }
        if self.sub_label.is_some_and(|sub| line.starts_with(sub)) {
            return HeaderLine::Continuation;
        }
        let marker_char = self.marker.chars().next().unwrap_or('/');
        let stripped = first_word(line.trim_start_matches(marker_char));
        if stripped.is_empty() || self.reserved.contains(&stripped) {
            return HeaderLine::Continuation;
        }
        match self.naming {
            SectionNaming::Stripped => HeaderLine::Named(stripped),
            SectionNaming::Verbatim => HeaderLine::Named(first_word(line)),
        }
    }
}

enum HeaderLine<'a> {
    Body,
    Continuation,
    Named(&'a str),
}

fn first_word(text: &str) -> &str {
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    &text[..end]
}

/// Named sections of one file, in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionedDocument {
    sections: IndexMap<String, Section>,
}

impl SectionedDocument {
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The section whose contents hold `line`.
    pub fn section_at_line(&self, line: usize) -> Option<(&str, &Section)> {
        self.iter().find(|(_, section)| section.contents.contains(line))
    }

    pub fn folding_ranges(&self) -> Vec<FoldRange> {
        self.sections.values().map(Section::fold).collect()
    }
}

/// Partitions `lines` into sections in one top-to-bottom pass.
///
/// A header commits the running section only if its contents are non-empty.
/// Continuation headers (bare markers, reserved names, sub-labels) extend the
/// running header and restart its contents on the following line.
pub fn compute_sections<S: AsRef<str>>(lines: &[S], grammar: &HeaderGrammar) -> SectionedDocument {
    let mut doc = SectionedDocument::default();
    let mut current: Option<String> = None;
    let mut header = LineRange::at(0);
    let mut contents = LineRange::at(0);

    for (i, line) in lines.iter().enumerate() {
        match grammar.classify(line.as_ref()) {
            HeaderLine::Body => contents.end = i + 1,
            HeaderLine::Continuation => {
                header.end = i + 1;
                contents = LineRange::at(i + 1);
            }
            HeaderLine::Named(name) => {
                commit(&mut doc, current.take(), header, contents);
                header = LineRange::new(i, i + 1);
                contents = LineRange::at(i + 1);
                current = Some(name.to_string());
            }
        }
    }
    commit(&mut doc, current, header, contents);
    doc
}

fn commit(doc: &mut SectionedDocument, name: Option<String>, header: LineRange, contents: LineRange) {
    if let Some(name) = name {
        if !contents.is_empty() {
            doc.sections.insert(name, Section { header, contents });
        }
    }
}
