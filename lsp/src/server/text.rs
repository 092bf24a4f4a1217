use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// Rope char index of an LSP position (UTF-16 columns), clamped to the line end.
pub(crate) fn position_to_char_idx(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return text.len_chars();
    }
    let line_start = text.line_to_char(line_idx);
    let line = text.line(line_idx);
    let target = pos.character as usize;

    // controller exports are ASCII almost always
    if let Some(s) = line.as_str().filter(|s| s.is_ascii()) {
        return line_start + target.min(content_len(s));
    }

    let mut units = 0usize;
    let mut chars = 0usize;
    for ch in line.chars() {
        if ch == '\n' || ch == '\r' || units + ch.len_utf16() > target {
            break;
        }
        units += ch.len_utf16();
        chars += 1;
    }
    line_start + chars
}

fn content_len(line: &str) -> usize {
    line.trim_end_matches(['\n', '\r']).len()
}

/// Applies one change event; a change without a range replaces the whole text.
pub(crate) fn apply_change(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = &change.range else {
        *text = Rope::from_str(&change.text);
        return;
    };
    let a = position_to_char_idx(text, range.start);
    let b = position_to_char_idx(text, range.end);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    if start != end {
        text.remove(start..end);
    }
    if !change.text.is_empty() {
        text.insert(start, &change.text);
    }
}
