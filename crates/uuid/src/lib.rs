//! Document file identifiers.
//!
//! Every uploaded document is stored under a server-generated identifier that doubles as the
//! filename stem (`<id>.pdf`) and as the key correlating a metadata record with its file.
//!
//! The canonical identifier form is a random (v4) UUID in **lowercase hyphenated** form:
//!
//! - Length: 36
//! - Layout: `8-4-4-4-12` groups of `0-9`/`a-f`, separated by `-`
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Notes:
//! - This is the same value you would get from `Uuid::new_v4().hyphenated().to_string()`.
//! - Canonical form is *required* for externally supplied identifiers (download and delete
//!   requests). Use [`FileId::parse`] to validate an input string.
//! - Non-canonical values (uppercase, simple/braced/urn forms, path fragments) are rejected,
//!   so a parsed identifier can always be joined onto a directory without escaping it.

mod service;

pub use service::{FileId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
