//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_METADATA_FILE, DEFAULT_UPLOAD_DIR};
use crate::{DocumentError, DocumentResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    upload_dir: PathBuf,
    metadata_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidInput` if either path is empty.
    pub fn new(upload_dir: PathBuf, metadata_file: PathBuf) -> DocumentResult<Self> {
        if upload_dir.as_os_str().is_empty() {
            return Err(DocumentError::InvalidInput(
                "upload_dir cannot be empty".into(),
            ));
        }
        if metadata_file.as_os_str().is_empty() {
            return Err(DocumentError::InvalidInput(
                "metadata_file cannot be empty".into(),
            ));
        }

        Ok(Self {
            upload_dir,
            metadata_file,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn metadata_file(&self) -> &Path {
        &self.metadata_file
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            metadata_file: PathBuf::from(DEFAULT_METADATA_FILE),
        }
    }
}

/// Build a `CoreConfig` from optional raw values (typically environment variables).
///
/// Missing or whitespace-only values fall back to the defaults.
pub fn core_config_from_env_values(
    upload_dir: Option<String>,
    metadata_file: Option<String>,
) -> DocumentResult<CoreConfig> {
    fn or_default(value: Option<String>, default: &str) -> PathBuf {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default))
    }

    CoreConfig::new(
        or_default(upload_dir, DEFAULT_UPLOAD_DIR),
        or_default(metadata_file, DEFAULT_METADATA_FILE),
    )
}
