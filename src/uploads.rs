//! Storage for uploaded transaction files

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Longest sanitized client name kept in a storage name
const MAX_NAME_LEN: usize = 100;

/// Writes uploads under a single directory with generated names.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `bytes` and return the stored path.
    ///
    /// The directory is created on demand. The stored name is a random
    /// token followed by the sanitized client name, so two uploads never
    /// share a path.
    pub async fn persist(&self, client_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(storage_name(client_name));
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), bytes = bytes.len(), "Upload persisted");
        Ok(path)
    }
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Directory parts are stripped, characters outside `[A-Za-z0-9._-]`
/// become `_`, and leading dots are removed.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let keep = trimmed.len().saturating_sub(MAX_NAME_LEN);
    let sanitized = &trimmed[keep..];

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized.to_string()
    }
}

/// Lower-cased extension of a client filename, without the dot
pub fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn storage_name(client_name: &str) -> String {
    format!("{:016x}_{}", rand::random::<u64>(), sanitize_filename(client_name))
}
