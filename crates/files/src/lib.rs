//! Docstore File Storage
//!
//! This crate owns the upload directory: the flat folder where every uploaded document lives as
//! `<file-id>.pdf`.
//!
//! ## Design Principles
//!
//! - The upload directory holds bytes only; names and dates live in the metadata store
//! - Files are addressed exclusively through a validated [`FileId`], so a caller can never
//!   build a path outside the upload directory
//! - Files are written once; an identifier that already has a file is refused
//! - Nothing here knows about metadata records, so orphan detection works from the outside
//!
//! ## Storage Layout
//!
//! ```text
//! upload/
//! ├── 550e8400-e29b-41d4-a716-446655440000.pdf
//! └── 9b2f1c0e-7d3a-4f5b-8c6d-0e1f2a3b4c5d.pdf
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use docstore_files::{FileId, FilesService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FilesService::new(Path::new("upload"))?;
//! let stored = service.write(&FileId::new(), b"%PDF-1.7")?;
//! println!("stored at {}", stored.path.display());
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;

pub use constants::{PDF_EXTENSION, PDF_MEDIA_TYPE};
pub use docstore_uuid::FileId;
pub use files::{FilesService, StoredFile};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Upload directory does not exist or is not a directory
    #[error("Invalid upload directory: {0}")]
    InvalidRootDirectory(String),

    /// No file is stored for the identifier
    #[error("File not found: {0}")]
    NotFound(String),

    /// A file is already stored for the identifier (files are write-once)
    #[error("File {0} already exists in storage")]
    FileAlreadyExists(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
