//! Upload-directory storage service implementation
//!
//! This module provides [`FilesService`], the only component that touches document bytes on
//! disk.
//!
//! # Storage Layout
//!
//! Every document is a single file directly inside the upload directory, named after its
//! identifier:
//!
//! ```text
//! <upload_dir>/<file-id>.pdf
//! ```
//!
//! There is no sharding and no sidecar metadata; the metadata store keeps names and dates.
//!
//! # Security Model
//!
//! - Paths are only ever derived from a parsed [`FileId`], which cannot contain separators or
//!   `..` segments
//! - Upload directory existence is validated at construction time
//! - Writes use `create_new`, so an existing file is never overwritten
//!
//! # Implementation Notes
//!
//! - The service keeps the upload directory exactly as configured (it is not canonicalised),
//!   because the path it reports back to clients is derived from it
//! - The service is cheap to clone and holds no open handles

use crate::{FilesError, PDF_EXTENSION};
use chrono::{DateTime, Utc};
use docstore_uuid::FileId;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Result of storing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Identifier the bytes were stored under
    pub id: FileId,

    /// Location of the stored file, relative to wherever the upload directory was configured
    pub path: PathBuf,

    /// Size of the file in bytes
    pub size_bytes: u64,

    /// Media type sniffed from the content, if recognisable
    ///
    /// Best-effort only. Uploads are accepted on filename extension alone, so this may well
    /// be something other than `application/pdf`.
    pub media_type: Option<String>,

    /// UTC timestamp when the file was written
    pub stored_at: DateTime<Utc>,
}

/// Service for managing document files within the upload directory
#[derive(Debug, Clone)]
pub struct FilesService {
    /// Directory holding every stored document
    root_directory: PathBuf,
}

impl FilesService {
    /// Creates a new `FilesService` over an existing upload directory
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidRootDirectory` if the directory does not exist or is not a
    /// directory.
    pub fn new(root_directory: &Path) -> Result<Self, FilesError> {
        if !root_directory.exists() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Directory does not exist: {}",
                root_directory.display()
            )));
        }

        if !root_directory.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        Ok(Self {
            root_directory: root_directory.to_path_buf(),
        })
    }

    /// Creates the upload directory (and parents) if missing, then opens it
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the directory cannot be created, or any error from
    /// [`FilesService::new`].
    pub fn open_or_create(root_directory: &Path) -> Result<Self, FilesError> {
        fs::create_dir_all(root_directory).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create upload directory {}: {}",
                    root_directory.display(),
                    e
                ),
            ))
        })?;
        Self::new(root_directory)
    }

    /// Writes `content` as the document for `id`
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - a file is already stored for `id`
    /// - the file cannot be created or written (I/O)
    pub fn write(&self, id: &FileId, content: &[u8]) -> Result<StoredFile, FilesError> {
        let path = self.path_for(id);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => FilesError::FileAlreadyExists(id.to_string()),
                _ => FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create {}: {}", path.display(), e),
                )),
            })?;

        file.write_all(content)
            .and_then(|()| file.sync_all())
            .map_err(|e| {
                FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write file to {}: {}", path.display(), e),
                ))
            })?;

        let media_type = infer::get(content).map(|kind| kind.mime_type().to_string());

        Ok(StoredFile {
            id: *id,
            path,
            size_bytes: content.len() as u64,
            media_type,
            stored_at: Utc::now(),
        })
    }

    /// Reads the stored document for `id`
    ///
    /// # Errors
    ///
    /// Returns `FilesError::NotFound` if no file is stored for `id`, or `FilesError::Io` if it
    /// cannot be read.
    pub fn read(&self, id: &FileId) -> Result<Vec<u8>, FilesError> {
        let path = self.path_for(id);

        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FilesError::NotFound(id.to_string()),
            _ => FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read file from {}: {}", path.display(), e),
            )),
        })
    }

    /// Returns true if a regular file is stored for `id`
    pub fn exists(&self, id: &FileId) -> bool {
        self.path_for(id).is_file()
    }

    /// Removes the stored document for `id`
    ///
    /// # Errors
    ///
    /// Returns `FilesError::NotFound` if no file is stored for `id`, or `FilesError::Io` for any
    /// other removal failure.
    pub fn remove(&self, id: &FileId) -> Result<(), FilesError> {
        let path = self.path_for(id);

        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FilesError::NotFound(id.to_string()),
            _ => FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to remove {}: {}", path.display(), e),
            )),
        })
    }

    /// Lists the identifiers of every stored document, sorted
    ///
    /// Entries that are not `<canonical-id>.pdf` regular files are ignored.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the upload directory cannot be read.
    pub fn list_ids(&self) -> Result<Vec<FileId>, FilesError> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.root_directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(PDF_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(id) = FileId::parse(stem) {
                ids.push(id);
            }
        }

        ids.sort_by_key(|id| id.to_string());
        Ok(ids)
    }

    /// Returns the path a document with `id` is (or would be) stored at
    #[must_use]
    pub fn path_for(&self, id: &FileId) -> PathBuf {
        self.root_directory.join(id.file_name(PDF_EXTENSION))
    }

    /// Returns the upload directory as configured
    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }
}
