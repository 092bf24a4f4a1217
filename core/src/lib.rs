pub mod address;
pub mod commands;
pub mod controller;
pub mod diagnostics;
pub mod files;
pub mod i18n;
pub mod program;
pub mod section;
pub mod settings;
pub mod text;
pub mod types;

// Entry point for editor requests
pub mod workspace;


pub use files::FileKind;
pub use settings::{Settings, SettingsStore};
pub use text::{DiskSource, LineSource, MemorySource};
pub use types::{CompletionEntry, Finding, FoldRange, Location, Lookup, Position, QuickFix, Severity, TextRange};
pub use workspace::{Services, Workspace};
