//! Local-disk storage for uploaded permission documents.
//!
//! Files are written under one flat directory and named by
//! [`generate_reference`]; the original filename is only kept in the
//! database. Every operation that takes a reference checks it with
//! [`is_valid_reference`] first, so a tampered value cannot leave the
//! directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use autoriza_core::error::CoreError;
use autoriza_core::upload::{
    generate_reference, is_valid_reference, validate_file_size, validate_mime_type,
};

use crate::error::{resource_not_found, AppError};

/// Error type for file store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The upload broke a type or size rule.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The reference is not one this store could have produced.
    #[error("Invalid file reference")]
    InvalidReference,

    #[error("File not found")]
    NotFound,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Rejected(core) => AppError::Core(core),
            StorageError::InvalidReference | StorageError::NotFound => resource_not_found("File"),
            StorageError::Io(e) => AppError::InternalError(format!("File storage error: {e}")),
        }
    }
}

/// Metadata of a successfully stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub reference: String,
    pub size: usize,
    pub mime_type: String,
}

/// A file found in the upload directory.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub reference: String,
    pub modified: SystemTime,
}

pub struct FileStore {
    root: PathBuf,
    max_file_size: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_file_size: usize) -> Self {
        Self {
            root: root.into(),
            max_file_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Validate and write an upload under a fresh random name.
    pub async fn save(
        &self,
        original_filename: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let mime_type = validate_mime_type(content_type)?;
        validate_file_size(bytes.len(), self.max_file_size)?;

        self.ensure_root().await?;
        let reference = generate_reference(original_filename);
        tokio::fs::write(self.root.join(&reference), bytes).await?;

        tracing::debug!(reference = %reference, size = bytes.len(), "Stored upload");
        Ok(StoredFile {
            reference,
            size: bytes.len(),
            mime_type,
        })
    }

    /// Read a stored file into memory.
    pub async fn open(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(reference)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file. Returns `false` if it was already gone.
    pub async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        let path = self.path_for(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a file, logging instead of failing. Used after the owning row
    /// is already gone, or to undo a write whose row never committed.
    pub async fn delete_quietly(&self, reference: &str) {
        if let Err(e) = self.delete(reference).await {
            tracing::error!(error = %e, reference, "Failed to delete stored file");
        }
    }

    /// Every file in the upload directory that looks like one of ours.
    pub async fn list_references(&self) -> Result<Vec<StoredEntry>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_valid_reference(&name) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            found.push(StoredEntry {
                reference: name,
                modified: metadata.modified()?,
            });
        }
        Ok(found)
    }

    fn path_for(&self, reference: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_reference(reference) {
            return Err(StorageError::InvalidReference);
        }
        Ok(self.root.join(reference))
    }
}
