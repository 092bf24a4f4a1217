use std::collections::HashMap;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Context;
use regex::Regex;
use tracing::{debug, warn};

use crate::types::TextRange;

/// Immutable line view of one file's text. Line terminators are stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSnapshot {
    lines: Vec<String>,
}

impl TextSnapshot {
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn line(&self, line_no: usize) -> Option<&str> {
        self.lines.get(line_no).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First match of `re` inside `lines` (clamped to the snapshot).
    ///
    /// When the pattern has a capture group named `hit`, the returned range covers
    /// that group instead of the whole match.
    pub fn search(&self, re: &Regex, lines: Range<usize>) -> Option<TextRange> {
        let end = lines.end.min(self.lines.len());
        for line_no in lines.start..end {
            let text = &self.lines[line_no];
            let Some(caps) = re.captures(text) else {
                continue;
            };
            let Some(hit) = caps.name("hit").or_else(|| caps.get(0)) else {
                continue;
            };
            return Some(byte_span_range(text, line_no, hit.range()));
        }
        None
    }
}

/// UTF-16 column of a byte offset inside `line`.
pub fn byte_to_column(line: &str, byte: usize) -> u32 {
    let byte = byte.min(line.len());
    line[..floor_char_boundary(line, byte)].encode_utf16().count() as u32
}

/// Byte offset of a UTF-16 column inside `line`, clamped to the end of the line.
pub fn column_to_byte(line: &str, column: u32) -> usize {
    let target = column as usize;
    let mut seen = 0usize;
    for (idx, ch) in line.char_indices() {
        if seen >= target {
            return idx;
        }
        seen += ch.len_utf16();
    }
    line.len()
}

pub fn byte_span_range(line: &str, line_no: usize, span: Range<usize>) -> TextRange {
    TextRange::on_line(line_no as u32, byte_to_column(line, span.start), byte_to_column(line, span.end))
}

fn floor_char_boundary(line: &str, mut byte: usize) -> usize {
    while byte > 0 && !line.is_char_boundary(byte) {
        byte -= 1;
    }
    byte
}

/// Where file text comes from: open editor buffers, the disk, or both.
pub trait LineSource: Send + Sync {
    /// Current text of `path`, or `None` when it cannot be read.
    fn snapshot(&self, path: &Path) -> Option<Arc<TextSnapshot>>;

    fn exists(&self, path: &Path) -> bool {
        self.snapshot(path).is_some()
    }

    /// Files directly inside `dir`.
    fn list_dir(&self, dir: &Path) -> Vec<PathBuf> {
        list_dir_on_disk(dir)
    }
}

pub fn list_dir_on_disk(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
        Err(err) => {
            debug!("cannot list {}: {}", dir.display(), err);
            Vec::new()
        }
    }
}

/// Reads a file as text. Controller exports are not always valid UTF-8, so
/// undecodable bytes are replaced rather than rejected.
pub fn read_text_file(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read file '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Plain on-disk text access.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSource;

impl LineSource for DiskSource {
    fn snapshot(&self, path: &Path) -> Option<Arc<TextSnapshot>> {
        match read_text_file(path) {
            Ok(text) => Some(Arc::new(TextSnapshot::from_text(&text))),
            Err(err) => {
                let missing = err
                    .downcast_ref::<io::Error>()
                    .map(|e| e.kind() == io::ErrorKind::NotFound)
                    .unwrap_or(false);
                if missing {
                    debug!("{err:#}");
                } else {
                    warn!("{err:#}");
                }
                None
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory file set, keyed by path.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<HashMap<PathBuf, Arc<TextSnapshot>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, text: &str) {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), Arc::new(TextSnapshot::from_text(text)));
        }
    }

    pub fn remove(&self, path: &Path) {
        if let Ok(mut files) = self.files.write() {
            files.remove(path);
        }
    }
}

impl LineSource for MemorySource {
    fn snapshot(&self, path: &Path) -> Option<Arc<TextSnapshot>> {
        self.files.read().ok()?.get(path).cloned()
    }

    fn list_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let Ok(files) = self.files.read() else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = files.keys().filter(|p| p.parent() == Some(dir)).cloned().collect();
        paths.sort();
        paths
    }
}
