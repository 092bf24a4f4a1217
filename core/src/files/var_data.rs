use super::{FileContext, FileHandler};
use crate::address::variable::variable_data_slot_at;
use crate::types::{FoldRange, Position};

/// `VAR.DAT`, the variable values.
pub(super) struct VarDataFile;

impl FileHandler for VarDataFile {
    fn hover(&self, cx: &FileContext<'_>, pos: Position) -> Option<String> {
        let (section, index) = variable_data_slot_at(cx.sections()?, cx.text()?, pos)?;
        Some(format!("{section} {index}"))
    }

    fn folding_ranges(&self, cx: &FileContext<'_>) -> Vec<FoldRange> {
        cx.section_folds()
    }
}
