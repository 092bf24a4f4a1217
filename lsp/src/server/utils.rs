use std::hash::Hasher;

use twox_hash::XxHash64;

/// xxHash64 of a document's text, used to skip no-op change notifications.
pub(crate) fn compute_content_hash(content: &str) -> u64 {
    let mut hasher = XxHash64::default();
    hasher.write(content.as_bytes());
    hasher.finish()
}
