use super::io::*;
use crate::section::{HeaderGrammar, compute_sections};
use crate::text::TextSnapshot;
use crate::types::{Position, TextRange};

const IONAME: &str = "//IONAME
///IN
START,STOP,,RESET
GRIP1,,,
DOOR
///OUT
LAMP,BUZZER";

fn fixture() -> (crate::section::SectionedDocument, TextSnapshot) {
    let text = TextSnapshot::from_text(IONAME);
    let doc = compute_sections(text.lines(), &HeaderGrammar::DATA);
    (doc, text)
}

#[test]
fn test_bank_group_bit_round_trip() {
    for bank in IoBank::ALL {
        for group in [1, 2, 17, 512] {
            for bit in 0..8 {
                let address = IoAddress::new(bank, group, bit).unwrap();
                assert_eq!(address.logical(), bank.offset() + group * 10 + bit);
                assert_eq!((address.bank(), address.group(), address.bit()), (bank, group, bit));
                assert_eq!(IoAddress::from_logical(address.logical()), Some(address));
            }
        }
    }
}

#[test]
fn test_invalid_components_are_rejected() {
    assert!(IoAddress::new(IoBank::In, 0, 3).is_none());
    assert!(IoAddress::new(IoBank::In, 1, 8).is_none());
    assert!(IoAddress::from_logical(10009).is_none());
    assert!(IoAddress::from_logical(5).is_none());
    assert!(IoAddress::from_logical(40010).is_none());
    assert!(IoAddress::from_sequential(IoBank::In, 0).is_none());
}

#[test]
fn test_oversized_components_do_not_overflow() {
    assert!(IoAddress::new(IoBank::ExOut, u32::MAX, 7).is_none());
    assert!(IoAddress::new(IoBank::In, MAX_GROUP + 1, 0).is_none());
    assert_eq!(IoAddress::new(IoBank::ExOut, MAX_GROUP, 7).unwrap().logical(), 39997);

    assert!(IoAddress::from_sequential(IoBank::Out, u32::MAX).is_none());
    assert!(IoAddress::from_sequential(IoBank::Out, 7993).is_none());
    assert_eq!(IoAddress::from_sequential(IoBank::Out, 7992).unwrap().sequential(), 7992);

    assert!(IoAddress::from_name_position(IoBank::In, u32::MAX, 3).is_none());
    assert!(IoAddress::from_logical(u32::MAX).is_none());
}

#[test]
fn test_name_position_round_trip() {
    for line_offset in 0..40 {
        for index in 0..NAMES_PER_LINE {
            let address = IoAddress::from_name_position(IoBank::ExOut, line_offset, index).unwrap();
            assert_eq!(address.name_position(), (line_offset, index));
        }
    }
}

#[test]
fn test_sequential_numbers_match_name_table_order() {
    // IN#(1) is the first name of the IN section, IN#(9) opens group 2
    assert_eq!(IoAddress::from_sequential(IoBank::In, 1).unwrap().logical(), 10);
    assert_eq!(IoAddress::from_sequential(IoBank::In, 8).unwrap().logical(), 17);
    assert_eq!(IoAddress::from_sequential(IoBank::In, 9).unwrap().logical(), 20);
    assert_eq!(IoAddress::from_sequential(IoBank::Out, 5).unwrap().logical(), 10014);

    for n in 1..100 {
        let address = IoAddress::from_sequential(IoBank::Out, n).unwrap();
        assert_eq!(address.sequential(), n);
        let (line, index) = address.name_position();
        assert_eq!(line * NAMES_PER_LINE + index + 1, n);
    }
}

#[test]
fn test_name_table_registers_non_empty_names() {
    let (doc, text) = fixture();
    let table = IoNameTable::build(&doc, &text);

    assert_eq!(table.len(), 7);
    assert_eq!(table.name(IoAddress::from_logical(10).unwrap()), Some("START"));
    assert_eq!(table.name(IoAddress::from_logical(11).unwrap()), Some("STOP"));
    assert_eq!(table.name(IoAddress::from_logical(12).unwrap()), None);
    assert_eq!(table.name(IoAddress::from_logical(13).unwrap()), Some("RESET"));
    assert_eq!(table.name(IoAddress::from_logical(14).unwrap()), Some("GRIP1"));
    assert_eq!(table.name(IoAddress::from_logical(20).unwrap()), Some("DOOR"));
    assert_eq!(table.name(IoAddress::from_logical(10011).unwrap()), Some("BUZZER"));
}

#[test]
fn test_reverse_range_lands_on_source_token() {
    let (doc, text) = fixture();
    let table = IoNameTable::build(&doc, &text);

    for (address, entry) in table.iter() {
        assert_eq!(io_name_range(&doc, &text, address), Some(entry.range), "{address}");
    }
    assert_eq!(
        io_name_range(&doc, &text, IoAddress::from_logical(13).unwrap()),
        Some(TextRange::on_line(2, 12, 17))
    );
    // group 3 would be past the end of the IN section
    assert!(io_name_range(&doc, &text, IoAddress::from_logical(30).unwrap()).is_none());
    assert!(io_name_range(&doc, &text, IoAddress::from_logical(20010).unwrap()).is_none());
}

#[test]
fn test_slot_at_cursor_is_one_based() {
    let (doc, text) = fixture();
    assert_eq!(io_slot_at(&doc, &text, Position::new(2, 0)), Some(("IN".to_string(), 1)));
    assert_eq!(io_slot_at(&doc, &text, Position::new(2, 13)), Some(("IN".to_string(), 4)));
    assert_eq!(io_slot_at(&doc, &text, Position::new(3, 0)), Some(("IN".to_string(), 5)));
    assert_eq!(io_slot_at(&doc, &text, Position::new(6, 6)), Some(("OUT".to_string(), 2)));
    assert!(io_slot_at(&doc, &text, Position::new(1, 0)).is_none());
}
