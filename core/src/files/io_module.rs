use super::{FileContext, FileHandler};
use crate::types::{FoldRange, Position};

/// `IOMNAME.DAT`, names of the I/O modules.
pub(super) struct IoModuleNameFile;

impl FileHandler for IoModuleNameFile {
    fn hover(&self, cx: &FileContext<'_>, pos: Position) -> Option<String> {
        let line_no = pos.line as usize;
        let (_, section) = cx.sections()?.section_at_line(line_no)?;
        cx.line(pos.line)?;
        Some(format!("M {}", line_no - section.contents.start))
    }

    fn folding_ranges(&self, cx: &FileContext<'_>) -> Vec<FoldRange> {
        cx.section_folds()
    }
}
