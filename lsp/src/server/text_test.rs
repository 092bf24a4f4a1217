use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent};

use super::text::{apply_change, position_to_char_idx};

fn change(range: Option<((u32, u32), (u32, u32))>, text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: range.map(|((sl, sc), (el, ec))| Range::new(Position::new(sl, sc), Position::new(el, ec))),
        range_length: None,
        text: text.to_string(),
    }
}

#[test]
fn test_position_clamps_to_line_end() {
    let rope = Rope::from_str("NOP\r\nDOUT OT#(1) ON\nEND");
    assert_eq!(position_to_char_idx(&rope, Position::new(0, 2)), 2);
    assert_eq!(position_to_char_idx(&rope, Position::new(0, 40)), 3);
    assert_eq!(position_to_char_idx(&rope, Position::new(1, 5)), 10);
    assert_eq!(position_to_char_idx(&rope, Position::new(9, 0)), rope.len_chars());
}

#[test]
fn test_position_counts_utf16_units() {
    // U+1F916 takes two UTF-16 units but one char
    let rope = Rope::from_str("'\u{1F916}ロボ,GRIP1\n");
    assert_eq!(position_to_char_idx(&rope, Position::new(0, 3)), 2);
    assert_eq!(position_to_char_idx(&rope, Position::new(0, 5)), 4);
    // inside the surrogate pair stays before it
    assert_eq!(position_to_char_idx(&rope, Position::new(0, 2)), 1);
    assert_eq!(position_to_char_idx(&rope, Position::new(0, 99)), 10);
}

#[test]
fn test_incremental_changes() {
    let mut rope = Rope::from_str("NOP\nMOVJ C00000\nEND");
    apply_change(&mut rope, &change(Some(((1, 5), (1, 11))), "C00001"));
    assert_eq!(rope.to_string(), "NOP\nMOVJ C00001\nEND");

    apply_change(&mut rope, &change(Some(((0, 0), (0, 0))), "'"));
    assert_eq!(rope.to_string(), "'NOP\nMOVJ C00001\nEND");

    // reversed ranges are normalized
    apply_change(&mut rope, &change(Some(((2, 3), (1, 11))), ""));
    assert_eq!(rope.to_string(), "'NOP\nMOVJ C00001");
}

#[test]
fn test_full_replacement() {
    let mut rope = Rope::from_str("NOP");
    apply_change(&mut rope, &change(None, "END"));
    assert_eq!(rope.to_string(), "END");
}
