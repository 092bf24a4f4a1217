use super::variable::*;
use crate::section::{HeaderGrammar, compute_sections};
use crate::text::TextSnapshot;
use crate::types::{Position, TextRange};

const VARNAME: &str = "//VARNAME
///B
0 0,0,COUNTER
1 0,0,
2 0,0,GRIP1
2 0,0,SHADOWED
///I
5 1,0,OFFSET
not a row
6 1,0,IGNORED
///S
0 0,0,BANNER";

const VAR_DAT: &str = "//VAR
///B
0,1,2,3,4,5,6,7,8,9
10,11,12
///S
HELLO
WORLD";

fn names() -> (VarNameTable, TextSnapshot) {
    let text = TextSnapshot::from_text(VARNAME);
    let doc = compute_sections(text.lines(), &HeaderGrammar::VERBATIM);
    (VarNameTable::build(&doc, &text), text)
}

#[test]
fn test_var_type_round_trip() {
    for var_type in VarType::ALL {
        assert_eq!(var_type.as_str().parse::<VarType>(), Ok(var_type));
    }
    assert!("Q".parse::<VarType>().is_err());
    assert!(VarType::R.is_columnar());
    assert!(!VarType::BP.is_columnar());
    assert_eq!(VarType::EX.name_section(), "///EX");
    assert_eq!(VariableAddress::new(VarType::I, 7).to_string(), "I007");
}

#[test]
fn test_name_rows_are_read_per_type() {
    let (table, _) = names();

    assert_eq!(table.name(VariableAddress::new(VarType::B, 0)), Some("COUNTER"));
    assert_eq!(table.name(VariableAddress::new(VarType::B, 1)), Some(""));
    assert_eq!(table.name(VariableAddress::new(VarType::S, 0)), Some("BANNER"));
    assert_eq!(table.name(VariableAddress::new(VarType::D, 0)), None);
}

#[test]
fn test_first_duplicate_number_wins() {
    let (table, text) = names();
    let row = table.row(VariableAddress::new(VarType::B, 2)).unwrap();

    assert_eq!(row.name, "GRIP1");
    assert_eq!(row.range(&text), TextRange::on_line(4, 0, 11));
}

#[test]
fn test_section_stops_at_first_malformed_row() {
    let (table, _) = names();

    assert_eq!(table.name(VariableAddress::new(VarType::I, 5)), Some("OFFSET"));
    assert_eq!(table.name(VariableAddress::new(VarType::I, 6)), None);
}

#[test]
fn test_commented_out_row_quotes_the_name() {
    let (table, text) = names();
    let row = table.row(VariableAddress::new(VarType::B, 0)).unwrap();

    assert_eq!(row.commented_out(&text).as_deref(), Some("0 0,0,'COUNTER"));
}

#[test]
fn test_name_counts_include_blank_names() {
    let (table, _) = names();
    let counts = table.name_counts();

    assert_eq!(counts.get("GRIP1"), Some(&1));
    assert_eq!(counts.get(""), Some(&1));
    assert_eq!(counts.get("SHADOWED"), None);
}

#[test]
fn test_data_slot_columnar_and_row_types() {
    let text = TextSnapshot::from_text(VAR_DAT);
    let doc = compute_sections(text.lines(), &HeaderGrammar::DATA);

    assert_eq!(variable_data_slot_at(&doc, &text, Position::new(2, 0)), Some(("B".to_string(), 0)));
    assert_eq!(variable_data_slot_at(&doc, &text, Position::new(2, 6)), Some(("B".to_string(), 3)));
    assert_eq!(variable_data_slot_at(&doc, &text, Position::new(3, 3)), Some(("B".to_string(), 11)));
    assert_eq!(variable_data_slot_at(&doc, &text, Position::new(6, 2)), Some(("S".to_string(), 1)));
    assert!(variable_data_slot_at(&doc, &text, Position::new(1, 0)).is_none());
}
