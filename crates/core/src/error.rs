use docstore_files::FilesError;

/// Caller-side input problems. The `Display` text is what clients see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No file or name provided")]
    MissingFileOrName,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("Invalid file type, only PDF files are allowed")]
    InvalidFileType,
    #[error("File path not provided")]
    MissingFilePath,
}

/// Things a caller asked for that do not exist. The `Display` text is what clients see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    /// The metadata store has never been written.
    #[error("No documents found")]
    NoDocuments,
    /// No stored file for the identifier (which may not even be well formed).
    #[error("File not found")]
    File(String),
}

/// Coarse classification used by outer layers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("failed to read metadata file: {0}")]
    MetadataRead(std::io::Error),
    #[error("failed to write metadata file: {0}")]
    MetadataWrite(std::io::Error),
    #[error("failed to serialize metadata: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize metadata: {0}")]
    Deserialization(serde_json::Error),
    #[error("metadata store lock poisoned")]
    LockPoisoned,

    #[error("{0}")]
    Files(FilesError),
    #[error("failed to allocate an unused file identifier after {0} attempts")]
    IdAllocation(usize),
    #[error(
        "upload failed and cleanup also failed (path: {path}): upload={upload_error}; cleanup={cleanup_error}",
        path = path.display()
    )]
    CleanupAfterUploadFailed {
        path: std::path::PathBuf,
        #[source]
        upload_error: Box<DocumentError>,
        cleanup_error: FilesError,
    },
}

impl DocumentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocumentError::InvalidInput(_) | DocumentError::Validation(_) => ErrorKind::Validation,
            DocumentError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

impl From<FilesError> for DocumentError {
    fn from(e: FilesError) -> Self {
        match e {
            FilesError::NotFound(id) => DocumentError::NotFound(NotFoundError::File(id)),
            other => DocumentError::Files(other),
        }
    }
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;
