//! Comma-separated column arithmetic shared by the table codecs.

use std::ops::Range;

/// Byte span of the `index`-th comma-delimited field, commas excluded.
///
/// Returns `None` when the line has fewer than `index` commas.
pub fn field_span(line: &str, index: usize) -> Option<Range<usize>> {
    let mut start = 0usize;
    for _ in 0..index {
        start += line[start..].find(',')? + 1;
    }
    let end = line[start..].find(',').map_or(line.len(), |c| start + c);
    Some(start..end)
}

/// Index of the field holding byte offset `byte`, i.e. the number of commas before it.
pub fn field_index_at(line: &str, byte: usize) -> usize {
    line.bytes().take(byte.min(line.len())).filter(|b| *b == b',').count()
}

pub fn field(line: &str, index: usize) -> Option<&str> {
    field_span(line, index).map(|span| &line[span])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_span_excludes_commas() {
        let line = "10,,300,4";
        assert_eq!(field_span(line, 0), Some(0..2));
        assert_eq!(field_span(line, 1), Some(3..3));
        assert_eq!(field_span(line, 2), Some(4..7));
        assert_eq!(field_span(line, 3), Some(8..9));
        assert_eq!(field_span(line, 4), None);
    }

    #[test]
    fn test_field_index_counts_commas_before_cursor() {
        let line = "10,,300,4";
        assert_eq!(field_index_at(line, 0), 0);
        assert_eq!(field_index_at(line, 2), 0);
        assert_eq!(field_index_at(line, 3), 1);
        assert_eq!(field_index_at(line, 5), 2);
        assert_eq!(field_index_at(line, 99), 3);
    }

    #[test]
    fn test_field_span_and_index_agree() {
        let line = "A,BB,,CCC";
        for index in 0..4 {
            let span = field_span(line, index).unwrap();
            assert_eq!(field_index_at(line, span.start), index);
            assert_eq!(field_index_at(line, span.end), index);
        }
    }
}
