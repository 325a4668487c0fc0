//! File-based drawing storage inside the data directory

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::UNIX_EPOCH;

use crate::error::{Error, Result};
use crate::types::{FileEntry, Payload};

const DRAWING_EXTENSION: &str = ".json";

/// Standard alphabet, canonical padding, non-zero trailing bits accepted
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Drawing and export storage backed by a single flat directory.
///
/// Writes to the same filename are serialized through a per-filename async
/// mutex; writes to different files proceed independently. Writes are not
/// atomic, so a crash mid-write can leave a truncated file.
pub struct DrawingStore {
    data_dir: PathBuf,
    write_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DrawingStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write a payload to `<data_dir>/<filename>`, replacing any existing file.
    ///
    /// Returns the path that was written.
    pub async fn save(&self, filename: &str, payload: Payload) -> Result<PathBuf> {
        validate_save_name(filename)?;

        let bytes = match payload {
            Payload::RawJson(value) => serde_json::to_vec(&value)?,
            Payload::Base64(content) => decode_base64(&content)?,
        };

        let path = self.data_dir.join(filename);
        if path.parent() != Some(self.data_dir.as_path()) {
            return Err(Error::BadRequest(format!("Invalid filename: {}", filename)));
        }

        let lock = self.lock_for(filename);
        {
            let _guard = lock.lock().await;
            tokio::fs::write(&path, &bytes).await?;
        }
        self.release_lock(filename, lock);

        tracing::info!("Saved file to {}", path.display());
        Ok(path)
    }

    /// List saved drawings, sorted by filename descending
    pub async fn list(&self) -> Result<Vec<FileEntry>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Some(filename) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if !filename.ends_with(DRAWING_EXTENSION) {
                continue;
            }

            // follows symlinks
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", filename, e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata
                .modified()?
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or_default();

            files.push(FileEntry {
                filename,
                size: metadata.len(),
                modified,
            });
        }

        files.sort_by(|a, b| b.filename.cmp(&a.filename));
        Ok(files)
    }

    /// Read a saved drawing verbatim
    pub async fn load(&self, filename: &str) -> Result<Vec<u8>> {
        validate_drawing_name(filename)?;

        let path = self.data_dir.join(filename);
        if path.parent() != Some(self.data_dir.as_path()) {
            return Err(Error::BadRequest("Invalid filename".into()));
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("File not found: {}", filename)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn lock_for(&self, filename: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(filename.to_string()).or_default().clone()
    }

    /// Drop the map entry once no other writer holds it
    fn release_lock(&self, filename: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // one reference in the map, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(filename);
        }
    }
}

/// Reject names that could escape the data directory.
///
/// Any `/` or `..` anywhere in the name is refused, not only at path
/// component boundaries.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() || filename.contains('/') || filename.contains("..") {
        return Err(Error::BadRequest(format!("Invalid filename: {}", filename)));
    }
    Ok(())
}

/// Guard for names written by save: a single path component.
///
/// Unlike the load guard, `..` inside a name (`sketch..v2.png`) is allowed.
pub fn validate_save_name(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(Error::BadRequest(format!("Invalid filename: {}", filename)));
    }
    Ok(())
}

/// Filename guard for drawings: the traversal guard plus a `.json` suffix
pub fn validate_drawing_name(filename: &str) -> Result<()> {
    if !filename.ends_with(DRAWING_EXTENSION) {
        return Err(Error::BadRequest(format!("Invalid filename: {}", filename)));
    }
    validate_filename(filename)
}

/// Decode base64 content, dropping a leading data-URI header (`data:image/png;base64,`).
///
/// ASCII whitespace anywhere in the payload is ignored, so line-wrapped
/// base64 decodes.
pub fn decode_base64(content: &str) -> Result<Vec<u8>> {
    let encoded = match content.split_once(',') {
        Some((_header, encoded)) => encoded,
        None => content,
    };
    let encoded: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    LENIENT_BASE64
        .decode(&encoded)
        .map_err(|e| Error::BadRequest(format!("Invalid base64 content: {}", e)))
}
