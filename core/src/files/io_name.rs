use super::{FileContext, FileHandler};
use crate::address::io::{io_name_range, io_slot_at};
use crate::diagnostics::{COMMENT_MARK, NameEntry, NameTable, duplicate_names};
use crate::types::{Finding, FoldRange, Position, QuickFix, TextRange};

/// `IONAME.DAT` and `EXIONAME.DAT`, the I/O name tables.
pub(super) struct IoNameFile;

impl FileHandler for IoNameFile {
    fn validate(&self, cx: &FileContext<'_>) -> Option<Vec<Finding>> {
        let flags = cx.controller.alias_flags();
        if !NameTable::Io.is_checked(flags) {
            return None;
        }
        let text = cx.text()?;
        let doc = cx.sections()?;
        let table = cx.file.io_names(cx.source())?;
        let paired = if NameTable::Io.pairs_with_other(flags) {
            cx.controller.var_name_counts()
        } else {
            None
        };
        let entries = table.iter().filter_map(|(address, entry)| {
            Some(NameEntry {
                name: &entry.name,
                range: io_name_range(doc, text, address)?,
                fix: Some(format!("{COMMENT_MARK}{}", entry.name)),
            })
        });
        Some(duplicate_names(
            NameTable::Io,
            entries,
            &table.name_counts(),
            paired.as_ref(),
            cx.messages(),
        ))
    }

    fn hover(&self, cx: &FileContext<'_>, pos: Position) -> Option<String> {
        let (bank, number) = io_slot_at(cx.sections()?, cx.text()?, pos)?;
        Some(format!("{bank} {number}"))
    }

    fn folding_ranges(&self, cx: &FileContext<'_>) -> Vec<FoldRange> {
        cx.section_folds()
    }

    fn code_actions(&self, cx: &FileContext<'_>, requests: &[(TextRange, String)]) -> Vec<QuickFix> {
        cx.comment_out_fixes(requests)
    }
}
