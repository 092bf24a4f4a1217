//! Per-file-kind capabilities.
//!
//! Every robot controller file is one of a closed set of kinds. A kind maps to a
//! handler whose capabilities default to "nothing to offer".

mod io_list;
mod io_module;
mod io_name;
mod param_compare;
mod parameter;
mod program;
mod var_data;
mod var_name;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::address::{IoNameTable, ParameterValues, VarNameTable};
use crate::controller::Controller;
use crate::i18n::Messages;
use crate::section::{HeaderGrammar, SectionedDocument, compute_sections};
use crate::settings::Settings;
use crate::text::{LineSource, TextSnapshot};
use crate::types::{CompletionEntry, Finding, FoldRange, Location, Position, QuickFix, TextRange};
use crate::workspace::Services;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Program,
    Parameter,
    VariableData,
    VariableName,
    IoName,
    IoModuleName,
    ParamCompare,
    IoList,
    Generic,
}

impl FileKind {
    /// Dispatch on the file name, ignoring case.
    pub fn from_path(path: &Path) -> Self {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return FileKind::Generic;
        };
        let name = name.to_ascii_uppercase();
        match name.as_str() {
            "VAR.DAT" => FileKind::VariableData,
            "VARNAME.DAT" => FileKind::VariableName,
            "IONAME.DAT" | "EXIONAME.DAT" => FileKind::IoName,
            "IOMNAME.DAT" => FileKind::IoModuleName,
            "CIOPRG.LST" => FileKind::IoList,
            _ if name.ends_with(".JBI") => FileKind::Program,
            _ if name.ends_with(".PRM") => FileKind::Parameter,
            _ if name.ends_with(".PSC") => FileKind::ParamCompare,
            _ => FileKind::Generic,
        }
    }

    pub fn grammar(self) -> HeaderGrammar {
        match self {
            FileKind::Program => HeaderGrammar::PROGRAM,
            FileKind::Parameter => HeaderGrammar::PARAMETER,
            FileKind::IoModuleName => HeaderGrammar::IO_MODULE_NAME,
            FileKind::VariableData | FileKind::IoName => HeaderGrammar::DATA,
            FileKind::VariableName | FileKind::ParamCompare | FileKind::IoList | FileKind::Generic => {
                HeaderGrammar::VERBATIM
            }
        }
    }

    pub(crate) fn handler(self) -> &'static dyn FileHandler {
        match self {
            FileKind::Program => &program::ProgramFile,
            FileKind::Parameter => &parameter::ParameterFile,
            FileKind::VariableData => &var_data::VarDataFile,
            FileKind::VariableName => &var_name::VarNameFile,
            FileKind::IoName => &io_name::IoNameFile,
            FileKind::IoModuleName => &io_module::IoModuleNameFile,
            FileKind::ParamCompare => &param_compare::ParamCompareFile,
            FileKind::IoList => &io_list::IoListFile,
            FileKind::Generic => &GenericFile,
        }
    }
}

/// One file of a controller directory with its lazily built tables.
///
/// Everything derived from the text is computed at most once; an edit replaces
/// the whole object through [`Controller::evict`].
#[derive(Debug)]
pub struct RobotFile {
    path: PathBuf,
    kind: FileKind,
    settings: Settings,
    text: OnceCell<Option<Arc<TextSnapshot>>>,
    sections: OnceCell<Option<SectionedDocument>>,
    parameters: OnceCell<Option<ParameterValues>>,
    io_names: OnceCell<Option<IoNameTable>>,
    var_names: OnceCell<Option<VarNameTable>>,
}

impl RobotFile {
    pub fn new(path: PathBuf, settings: Settings) -> Self {
        Self {
            kind: FileKind::from_path(&path),
            path,
            settings,
            text: OnceCell::new(),
            sections: OnceCell::new(),
            parameters: OnceCell::new(),
            io_names: OnceCell::new(),
            var_names: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn text(&self, source: &dyn LineSource) -> Option<&TextSnapshot> {
        self.text.get_or_init(|| source.snapshot(&self.path)).as_deref()
    }

    pub fn sections(&self, source: &dyn LineSource) -> Option<&SectionedDocument> {
        self.sections
            .get_or_init(|| {
                let text = self.text(source)?;
                Some(compute_sections(text.lines(), &self.kind.grammar()))
            })
            .as_ref()
    }

    fn derived<'a, T>(
        &'a self,
        cell: &'a OnceCell<Option<T>>,
        source: &dyn LineSource,
        build: fn(&SectionedDocument, &TextSnapshot) -> T,
    ) -> Option<&'a T> {
        cell.get_or_init(|| {
            let text = self.text(source)?;
            let doc = self.sections(source)?;
            Some(build(doc, text))
        })
        .as_ref()
    }

    pub fn parameter_values(&self, source: &dyn LineSource) -> Option<&ParameterValues> {
        self.derived(&self.parameters, source, ParameterValues::build)
    }

    pub fn io_names(&self, source: &dyn LineSource) -> Option<&IoNameTable> {
        self.derived(&self.io_names, source, IoNameTable::build)
    }

    pub fn var_names(&self, source: &dyn LineSource) -> Option<&VarNameTable> {
        self.derived(&self.var_names, source, VarNameTable::build)
    }
}

/// Everything a handler needs to answer a request for one file.
pub struct FileContext<'a> {
    pub controller: &'a Controller,
    pub file: &'a RobotFile,
    pub services: &'a Services,
}

impl<'a> FileContext<'a> {
    pub fn source(&self) -> &'a dyn LineSource {
        self.controller.source()
    }

    pub fn text(&self) -> Option<&'a TextSnapshot> {
        self.file.text(self.controller.source())
    }

    pub fn line(&self, line_no: u32) -> Option<&'a str> {
        self.text()?.line(line_no as usize)
    }

    pub fn sections(&self) -> Option<&'a SectionedDocument> {
        self.file.sections(self.controller.source())
    }

    pub fn messages(&self) -> Messages<'a> {
        Messages::new(&self.services.translator, &self.file.settings.locale)
    }

    /// Folding ranges straight from the section table.
    pub fn section_folds(&self) -> Vec<FoldRange> {
        self.sections().map(SectionedDocument::folding_ranges).unwrap_or_default()
    }

    /// "Comment out" fixes replacing each range with the text the finding carried.
    pub fn comment_out_fixes(&self, requests: &[(TextRange, String)]) -> Vec<QuickFix> {
        let title = self.messages().tr("names.quickfix.toComment", &[]);
        requests
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(range, text)| QuickFix {
                title: title.clone(),
                path: self.file.path.clone(),
                range: *range,
                new_text: text.clone(),
            })
            .collect()
    }
}

pub(crate) trait FileHandler: Sync {
    fn validate(&self, _cx: &FileContext<'_>) -> Option<Vec<Finding>> {
        None
    }

    fn hover(&self, _cx: &FileContext<'_>, _pos: Position) -> Option<String> {
        None
    }

    fn definition(&self, _cx: &FileContext<'_>, _pos: Position) -> Option<Location> {
        None
    }

    fn folding_ranges(&self, _cx: &FileContext<'_>) -> Vec<FoldRange> {
        Vec::new()
    }

    fn completion(&self, _cx: &FileContext<'_>, _pos: Position) -> Option<Vec<CompletionEntry>> {
        None
    }

    /// Fixes for findings that carried replacement text.
    fn code_actions(&self, _cx: &FileContext<'_>, _requests: &[(TextRange, String)]) -> Vec<QuickFix> {
        Vec::new()
    }
}

struct GenericFile;

impl FileHandler for GenericFile {}
