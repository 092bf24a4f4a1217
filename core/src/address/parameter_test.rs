use super::parameter::*;
use crate::section::{HeaderGrammar, compute_sections};
use crate::text::TextSnapshot;
use crate::types::{Lookup, Position, TextRange};

const ALL_PRM: &str = "//S2C 12
0,1,2,3,4,5,6,7,8,9
10,11,12,13,14,15,16,17,18,19
20,,22,-23,24,25,26,27,28,29
//S3C 4
/CRC 1234
100,101,102,103";

fn fixture() -> (crate::section::SectionedDocument, TextSnapshot) {
    let text = TextSnapshot::from_text(ALL_PRM);
    let doc = compute_sections(text.lines(), &HeaderGrammar::PARAMETER);
    (doc, text)
}

#[test]
fn test_value_reads_line_and_column() {
    let (doc, text) = fixture();
    let codec = ParameterCodec::new(&doc, &text);
    let values = ParameterValues::build(&doc, &text);

    for line in 0..3u32 {
        for column in 0..10u32 {
            let address = ParameterAddress::new("S2C", line * 10 + column);
            let expected = if line == 2 && column == 1 {
                0.0
            } else if line == 2 && column == 3 {
                -23.0
            } else {
                (line * 10 + column) as f64
            };
            assert_eq!(values.lookup(&codec, &address), Lookup::Found(expected), "{address}");
        }
    }
}

#[test]
fn test_fractional_values_are_kept() {
    let text = TextSnapshot::from_text("//RS 1\n0.5, 1.25 ,abc,,-3.75");
    let doc = compute_sections(text.lines(), &HeaderGrammar::PARAMETER);
    let codec = ParameterCodec::new(&doc, &text);
    let values = ParameterValues::build(&doc, &text);

    let value = |number| values.lookup(&codec, &ParameterAddress::new("RS", number));
    assert_eq!(value(0), Lookup::Found(0.5));
    assert_eq!(value(1), Lookup::Found(1.25));
    assert_eq!(value(2), Lookup::Found(0.0));
    assert_eq!(value(3), Lookup::Found(0.0));
    assert_eq!(value(4), Lookup::Found(-3.75));
}

#[test]
fn test_out_of_range_is_not_found() {
    let (doc, text) = fixture();
    let codec = ParameterCodec::new(&doc, &text);
    let values = ParameterValues::build(&doc, &text);

    assert_eq!(values.lookup(&codec, &ParameterAddress::new("S2C", 30)), Lookup::OutOfRange);
    assert_eq!(values.lookup(&codec, &ParameterAddress::new("S4C", 0)), Lookup::OutOfRange);
    // declared by the line count even though the line is short
    assert_eq!(values.lookup(&codec, &ParameterAddress::new("S3C", 7)), Lookup::Found(0.0));
    assert!(codec.range(&ParameterAddress::new("S2C", 30)).is_none());
}

#[test]
fn test_range_covers_exact_token() {
    let (doc, text) = fixture();
    let codec = ParameterCodec::new(&doc, &text);

    assert_eq!(
        codec.range(&ParameterAddress::new("S2C", 12)),
        Some(TextRange::on_line(2, 6, 8))
    );
    assert_eq!(
        codec.range(&ParameterAddress::new("S2C", 21)),
        Some(TextRange::on_line(3, 3, 3))
    );
    assert_eq!(
        codec.range(&ParameterAddress::new("S3C", 2)),
        Some(TextRange::on_line(6, 8, 11))
    );
    assert!(codec.range(&ParameterAddress::new("S3C", 5)).is_none());
}

#[test]
fn test_address_at_inverts_range() {
    let (doc, text) = fixture();
    let codec = ParameterCodec::new(&doc, &text);

    for number in 0..30 {
        let address = ParameterAddress::new("S2C", number);
        let range = codec.range(&address).unwrap();
        assert_eq!(codec.address_at(range.start), Some(address));
    }
    assert!(codec.address_at(Position::new(4, 0)).is_none());
}
