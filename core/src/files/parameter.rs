use super::{FileContext, FileHandler};
use crate::address::ParameterCodec;
use crate::types::{FoldRange, Position};

/// `*.PRM` parameter tables.
pub(super) struct ParameterFile;

impl FileHandler for ParameterFile {
    fn hover(&self, cx: &FileContext<'_>, pos: Position) -> Option<String> {
        let address = ParameterCodec::new(cx.sections()?, cx.text()?).address_at(pos)?;
        Some(format!("{} {}", address.kind, address.number))
    }

    fn folding_ranges(&self, cx: &FileContext<'_>) -> Vec<FoldRange> {
        cx.section_folds()
    }
}
