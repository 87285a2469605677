//! # Docstore Core
//!
//! Core business logic for the document store.
//!
//! This crate contains pure data operations and file/folder management:
//! - Document upload, listing, download and deletion ([`DocumentService`])
//! - The JSON metadata store holding one record per document ([`MetadataStore`])
//! - Startup configuration ([`CoreConfig`])
//!
//! **No API concerns**: HTTP routing, status codes and wire bodies belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod documents;
pub mod error;
pub mod metadata;

pub use config::{core_config_from_env_values, CoreConfig};
pub use documents::{DocumentService, DownloadedDocument, OrphanReport, UploadFile, UploadedDocument};
pub use docstore_files::{FileId, PDF_MEDIA_TYPE};
pub use error::{DocumentError, DocumentResult, ErrorKind, NotFoundError, ValidationError};
pub use metadata::{DocumentRecord, MetadataStore};
