use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use inform_core::text::{DiskSource, LineSource, TextSnapshot};
use ropey::Rope;

use super::utils::compute_content_hash;

/// An open editor buffer.
#[derive(Debug)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    pub(crate) content_hash: u64,
    snapshot: Arc<TextSnapshot>,
}

impl Document {
    pub(crate) fn new(text: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(text),
            version,
            content_hash: compute_content_hash(text),
            snapshot: Arc::new(TextSnapshot::from_text(text)),
        }
    }

    /// Rebuilds the line snapshot after `content` was edited in place.
    /// Returns whether the text actually changed.
    pub(crate) fn refresh(&mut self) -> bool {
        let text = self.content.to_string();
        let hash = compute_content_hash(&text);
        if hash == self.content_hash {
            return false;
        }
        self.content_hash = hash;
        self.snapshot = Arc::new(TextSnapshot::from_text(&text));
        true
    }
}

/// Open documents keyed by file path. Reads of files that are not open fall
/// through to the disk, so unsaved edits win over what is stored.
#[derive(Debug, Default)]
pub(crate) struct OpenDocuments {
    documents: DashMap<PathBuf, Document>,
    disk: DiskSource,
}

impl OpenDocuments {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open(&self, path: PathBuf, text: &str, version: i32) {
        self.documents.insert(path, Document::new(text, version));
    }

    pub(crate) fn close(&self, path: &Path) -> bool {
        self.documents.remove(path).is_some()
    }

    pub(crate) fn get_mut(&self, path: &Path) -> Option<dashmap::mapref::one::RefMut<'_, PathBuf, Document>> {
        self.documents.get_mut(path)
    }

    pub(crate) fn version(&self, path: &Path) -> Option<i32> {
        self.documents.get(path).map(|doc| doc.version)
    }

    pub(crate) fn is_open(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }

    pub(crate) fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.documents.iter().map(|entry| entry.key().clone()).collect();
        paths.sort();
        paths
    }

    /// Open documents living directly in `dir`.
    pub(crate) fn paths_in(&self, dir: &Path) -> Vec<PathBuf> {
        self.paths()
            .into_iter()
            .filter(|path| path.parent() == Some(dir))
            .collect()
    }
}

impl LineSource for OpenDocuments {
    fn snapshot(&self, path: &Path) -> Option<Arc<TextSnapshot>> {
        if let Some(doc) = self.documents.get(path) {
            return Some(doc.snapshot.clone());
        }
        self.disk.snapshot(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.documents.contains_key(path) || self.disk.exists(path)
    }

    fn list_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let mut paths = self.disk.list_dir(dir);
        paths.extend(self.paths_in(dir));
        paths.sort();
        paths.dedup();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_document_shadows_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IONAME.DAT");
        std::fs::write(&path, "//IONAME\n///IN\nSAVED").unwrap();

        let store = OpenDocuments::new();
        assert_eq!(store.snapshot(&path).unwrap().line(2), Some("SAVED"));

        store.open(path.clone(), "//IONAME\n///IN\nEDITED", 1);
        assert_eq!(store.snapshot(&path).unwrap().line(2), Some("EDITED"));

        assert!(store.close(&path));
        assert_eq!(store.snapshot(&path).unwrap().line(2), Some("SAVED"));
    }

    #[test]
    fn test_unsaved_documents_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("MAIN.JBI"), "/JOB").unwrap();

        let store = OpenDocuments::new();
        store.open(dir.path().join("MAIN.JBI"), "/JOB", 1);
        store.open(dir.path().join("NEW.JBI"), "/JOB", 1);

        let listed = store.list_dir(dir.path());
        assert_eq!(listed, vec![dir.path().join("MAIN.JBI"), dir.path().join("NEW.JBI")]);
        assert!(store.exists(&dir.path().join("NEW.JBI")));
        assert!(!store.exists(&dir.path().join("OLD.JBI")));
    }

    #[test]
    fn test_refresh_detects_identical_text() {
        let mut doc = Document::new("NOP\nEND", 1);
        assert!(!doc.refresh());

        doc.content.insert(0, "'");
        assert!(doc.refresh());
        assert_eq!(doc.snapshot.line(0), Some("'NOP"));
    }
}
