//! Constants used throughout the docstore core crate.
//!
//! Path defaults and wire-visible strings live here so the binaries and the REST layer agree
//! on them.

/// Default directory for stored documents when no explicit directory is configured.
pub const DEFAULT_UPLOAD_DIR: &str = "upload";

/// Default path of the metadata store when none is configured.
pub const DEFAULT_METADATA_FILE: &str = "metadata.json";

/// Filename suffix an upload must carry to be accepted.
pub const PDF_FILENAME_SUFFIX: &str = ".pdf";

/// Format of the `date` field of a document record (day/month/year).
pub const RECORD_DATE_FORMAT: &str = "%d/%m/%Y";

/// Indentation used when pretty-printing the metadata store.
pub const METADATA_INDENT: &[u8] = b"    ";

/// Attempts made to allocate an unused file identifier before giving up.
pub const MAX_ID_ATTEMPTS: usize = 5;
