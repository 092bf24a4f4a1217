use once_cell::sync::Lazy;
use regex::Regex;

use super::{FileContext, FileHandler};
use crate::address::IoAddress;
use crate::types::Position;

static LOGICAL_IO: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([0-9]{5})(?-u:\b)").expect("logical io pattern"));

/// `CIOPRG.LST`, the concurrent I/O ladder listing.
pub(super) struct IoListFile;

impl FileHandler for IoListFile {
    fn hover(&self, cx: &FileContext<'_>, pos: Position) -> Option<String> {
        let caps = LOGICAL_IO.captures(cx.line(pos.line)?)?;
        let address = IoAddress::from_logical(caps[1].parse().ok()?)?;
        cx.controller.io_name(address)
    }
}
