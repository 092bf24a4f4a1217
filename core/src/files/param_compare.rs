use super::{FileContext, FileHandler};
use crate::diagnostics::{PscEntry, psc_address};
use crate::text::byte_span_range;
use crate::types::{Finding, Location, Lookup, Position};

/// `*.PSC` parameter comparison lists.
pub(super) struct ParamCompareFile;

impl FileHandler for ParamCompareFile {
    fn validate(&self, cx: &FileContext<'_>) -> Option<Vec<Finding>> {
        if !cx.controller.has_parameter_file() {
            return None;
        }
        let text = cx.text()?;
        let messages = cx.messages();
        let findings = text
            .lines()
            .iter()
            .enumerate()
            .filter_map(|(line_no, line)| {
                let entry = PscEntry::parse(line)?;
                let range = byte_span_range(line, line_no, entry.span.clone());
                entry.check(cx.controller.parameter_value(&entry.address), range, messages)
            })
            .collect();
        Some(findings)
    }

    fn hover(&self, cx: &FileContext<'_>, pos: Position) -> Option<String> {
        let address = psc_address(cx.line(pos.line)?)?;
        match cx.controller.parameter_value(&address) {
            Lookup::Found(value) => Some(format!("{address}: {value}")),
            _ => None,
        }
    }

    fn definition(&self, cx: &FileContext<'_>, pos: Position) -> Option<Location> {
        let address = psc_address(cx.line(pos.line)?)?;
        cx.controller.parameter_location(&address)
    }
}
