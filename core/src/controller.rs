//! Directory-scoped file registry and cross-file lookups.
//!
//! A robot controller backup is one flat directory: job programs next to the
//! parameter file and the name tables they refer to. A [`Controller`] owns the
//! file objects of one such directory and resolves addresses against the
//! sibling file that holds them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::address::io::io_name_range;
use crate::address::{IoAddress, ParameterAddress, ParameterCodec, VariableAddress};
use crate::files::RobotFile;
use crate::settings::SettingsStore;
use crate::text::LineSource;
use crate::types::{Location, Lookup, TextRange};

pub const PARAMETER_FILE: &str = "ALL.PRM";
/// Candidate I/O name tables, in lookup order.
pub const IO_NAME_FILES: [&str; 2] = ["IONAME.DAT", "EXIONAME.DAT"];
pub const VAR_NAME_FILE: &str = "VARNAME.DAT";
pub const JOB_EXTENSION: &str = "JBI";

/// Parameter enabling I/O names as aliases.
pub const IO_ALIAS_FLAG: (&str, u32) = ("S2C", 395);
/// Parameter enabling variable names as aliases.
pub const VAR_ALIAS_FLAG: (&str, u32) = ("S2C", 396);

/// Alias switches read from the parameter file. `None` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AliasFlags {
    pub io_names: Option<bool>,
    pub var_names: Option<bool>,
}

pub struct Controller {
    dir: PathBuf,
    source: Arc<dyn LineSource>,
    settings: Arc<SettingsStore>,
    files: DashMap<PathBuf, Arc<RobotFile>>,
}

impl Controller {
    pub fn new(dir: PathBuf, source: Arc<dyn LineSource>, settings: Arc<SettingsStore>) -> Self {
        Self {
            dir,
            source,
            settings,
            files: DashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source(&self) -> &dyn LineSource {
        self.source.as_ref()
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// The cached file object for `path`, created on first use.
    pub fn file(&self, path: &Path) -> Arc<RobotFile> {
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                debug!("loading {}", path.display());
                Arc::new(RobotFile::new(path.to_path_buf(), self.settings.resolve(path)))
            })
            .clone()
    }

    /// Path of the sibling called `name`, matched case-insensitively when the
    /// exact spelling is absent.
    pub fn find_sibling(&self, name: &str) -> Option<PathBuf> {
        let exact = self.path_of(name);
        if self.source.exists(&exact) {
            return Some(exact);
        }
        self.source.list_dir(&self.dir).into_iter().find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    /// A sibling file, or `None` when it does not exist.
    fn sibling(&self, name: &str) -> Option<Arc<RobotFile>> {
        let path = self.find_sibling(name)?;
        Some(self.file(&path))
    }

    /// Drops the cached object for `path`. Returns whether one was cached.
    pub fn evict(&self, path: &Path) -> bool {
        let evicted = self.files.remove(path).is_some();
        if evicted {
            debug!("evicted {}", path.display());
        }
        evicted
    }

    pub fn cached_files(&self) -> usize {
        self.files.len()
    }

    pub fn has_parameter_file(&self) -> bool {
        self.find_sibling(PARAMETER_FILE).is_some()
    }

    pub fn parameter_value(&self, address: &ParameterAddress) -> Lookup<f64> {
        let Some(file) = self.sibling(PARAMETER_FILE) else {
            return Lookup::SourceUnavailable;
        };
        let (Some(text), Some(doc), Some(values)) = (
            file.text(self.source()),
            file.sections(self.source()),
            file.parameter_values(self.source()),
        ) else {
            return Lookup::SourceUnavailable;
        };
        values.lookup(&ParameterCodec::new(doc, text), address)
    }

    pub fn parameter_location(&self, address: &ParameterAddress) -> Option<Location> {
        let file = self.sibling(PARAMETER_FILE)?;
        let text = file.text(self.source())?;
        let doc = file.sections(self.source())?;
        let range = ParameterCodec::new(doc, text).range(address)?;
        Some(Location::new(file.path().to_path_buf(), range))
    }

    pub fn alias_flags(&self) -> AliasFlags {
        let flag = |(kind, number): (&str, u32)| {
            self.parameter_value(&ParameterAddress::new(kind, number))
                .found()
                .map(|value| value != 0.0)
        };
        AliasFlags {
            io_names: flag(IO_ALIAS_FLAG),
            var_names: flag(VAR_ALIAS_FLAG),
        }
    }

    /// First I/O name table that names `address`.
    fn io_name_file(&self, address: IoAddress) -> Option<Arc<RobotFile>> {
        IO_NAME_FILES.iter().filter_map(|name| self.sibling(name)).find(|file| {
            file.io_names(self.source())
                .is_some_and(|table| table.name(address).is_some())
        })
    }

    pub fn io_name(&self, address: IoAddress) -> Option<String> {
        let file = self.io_name_file(address)?;
        file.io_names(self.source())?.name(address).map(str::to_string)
    }

    pub fn io_name_location(&self, address: IoAddress) -> Option<Location> {
        let file = self.io_name_file(address)?;
        let text = file.text(self.source())?;
        let doc = file.sections(self.source())?;
        let range = io_name_range(doc, text, address)?;
        Some(Location::new(file.path().to_path_buf(), range))
    }

    /// Name occurrence counts of the primary I/O name table.
    pub fn io_name_counts(&self) -> Option<FxHashMap<String, usize>> {
        let file = self.sibling(IO_NAME_FILES[0])?;
        file.io_names(self.source()).map(|table| table.name_counts())
    }

    pub fn var_name(&self, address: VariableAddress) -> Option<String> {
        let file = self.sibling(VAR_NAME_FILE)?;
        file.var_names(self.source())?.name(address).map(str::to_string)
    }

    pub fn var_name_location(&self, address: VariableAddress) -> Option<Location> {
        let file = self.sibling(VAR_NAME_FILE)?;
        let text = file.text(self.source())?;
        let range = file.var_names(self.source())?.row(address)?.range(text);
        Some(Location::new(file.path().to_path_buf(), range))
    }

    pub fn var_name_counts(&self) -> Option<FxHashMap<String, usize>> {
        let file = self.sibling(VAR_NAME_FILE)?;
        file.var_names(self.source()).map(|table| table.name_counts())
    }

    fn job_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.source.list_dir(&self.dir).into_iter().filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(JOB_EXTENSION))
        })
    }

    /// Stems of every job file in the directory, sorted.
    pub fn job_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .job_files()
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn job_path(&self, name: &str) -> Option<PathBuf> {
        self.find_sibling(&format!("{name}.{JOB_EXTENSION}"))
    }

    /// Location of the first line of a job file.
    pub fn job_location(&self, name: &str) -> Option<Location> {
        self.job_path(name)
            .map(|path| Location::new(path, TextRange::default()))
    }
}
