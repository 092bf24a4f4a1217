use super::{FileContext, FileHandler};
use crate::diagnostics::{NameEntry, NameTable, duplicate_names};
use crate::types::{Finding, FoldRange, QuickFix, TextRange};

/// `VARNAME.DAT`, the variable name table.
pub(super) struct VarNameFile;

impl FileHandler for VarNameFile {
    fn validate(&self, cx: &FileContext<'_>) -> Option<Vec<Finding>> {
        let flags = cx.controller.alias_flags();
        if !NameTable::Variable.is_checked(flags) {
            return None;
        }
        let text = cx.text()?;
        let table = cx.file.var_names(cx.source())?;
        let paired = if NameTable::Variable.pairs_with_other(flags) {
            cx.controller.io_name_counts()
        } else {
            None
        };
        let entries = table.iter().map(|(_, row)| NameEntry {
            name: &row.name,
            range: row.range(text),
            fix: row.commented_out(text),
        });
        Some(duplicate_names(
            NameTable::Variable,
            entries,
            &table.name_counts(),
            paired.as_ref(),
            cx.messages(),
        ))
    }

    fn folding_ranges(&self, cx: &FileContext<'_>) -> Vec<FoldRange> {
        cx.section_folds()
    }

    fn code_actions(&self, cx: &FileContext<'_>, requests: &[(TextRange, String)]) -> Vec<QuickFix> {
        cx.comment_out_fixes(requests)
    }
}
