//! Document operations.
//!
//! [`DocumentService`] pairs the upload directory ([`FilesService`]) with the
//! [`MetadataStore`] and implements upload, list, download and delete on top of them. It has no
//! HTTP knowledge; the REST layer maps [`DocumentError`] kinds to status codes.
//!
//! Upload and delete each touch two places (a file and a record) and there is no transaction
//! spanning both. Upload compensates: if the record cannot be appended, the file it just wrote
//! is removed again. Delete removes the file first and the record second; a failure in between
//! leaves a record without a file, which [`DocumentService::find_orphans`] reports.

use crate::config::CoreConfig;
use crate::constants::{MAX_ID_ATTEMPTS, PDF_FILENAME_SUFFIX, RECORD_DATE_FORMAT};
use crate::error::{NotFoundError, ValidationError};
use crate::metadata::{DocumentRecord, MetadataStore};
use crate::{DocumentError, DocumentResult};
use docstore_files::{FileId, FilesError, FilesService, StoredFile, PDF_EXTENSION, PDF_MEDIA_TYPE};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// A file part received from a client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Filename as sent by the client. May be empty.
    pub filename: String,
    pub content: Vec<u8>,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub id: FileId,
    /// Where the file was stored, relative to the configured upload directory's base.
    pub file_path: PathBuf,
    /// Upload date, `dd/mm/yyyy`.
    pub date: String,
}

/// Content of a stored document, ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedDocument {
    pub id: FileId,
    /// `<id>.pdf`
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Mismatches between the metadata store and the upload directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrphanReport {
    /// Records whose identifier has no stored file (or is not a valid identifier at all).
    pub records_without_file: Vec<DocumentRecord>,
    /// Stored files that no record refers to.
    pub files_without_record: Vec<FileId>,
}

impl OrphanReport {
    pub fn is_empty(&self) -> bool {
        self.records_without_file.is_empty() && self.files_without_record.is_empty()
    }
}

/// Upload, list, download and delete documents.
///
/// Cheap to clone; clones share the same metadata store and therefore the same writer lock.
#[derive(Clone, Debug)]
pub struct DocumentService {
    files: FilesService,
    metadata: Arc<MetadataStore>,
}

impl DocumentService {
    /// Opens the service described by `cfg`, creating the upload directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload directory cannot be created or is not a directory.
    pub fn new(cfg: &CoreConfig) -> DocumentResult<Self> {
        let files = FilesService::open_or_create(cfg.upload_dir())?;
        let metadata = Arc::new(MetadataStore::new(cfg.metadata_file()));
        Ok(Self { files, metadata })
    }

    pub fn files(&self) -> &FilesService {
        &self.files
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Stores an uploaded PDF and records it.
    ///
    /// Both `name` and `file` must be present, the filename must be non-empty and end in
    /// `.pdf`. Content is never rejected (an empty body is accepted); content that does not
    /// sniff as a PDF is only logged.
    ///
    /// # Errors
    ///
    /// - `ValidationError` for any of the input checks above (nothing is written)
    /// - file write failures
    /// - metadata append failures, after the stored file has been removed again; if that
    ///   removal also fails, `DocumentError::CleanupAfterUploadFailed`
    pub fn upload(
        &self,
        name: Option<String>,
        file: Option<UploadFile>,
    ) -> DocumentResult<UploadedDocument> {
        let (Some(name), Some(file)) = (name, file) else {
            return Err(ValidationError::MissingFileOrName.into());
        };
        if file.filename.is_empty() {
            return Err(ValidationError::NoSelectedFile.into());
        }
        if !file.filename.ends_with(PDF_FILENAME_SUFFIX) {
            return Err(ValidationError::InvalidFileType.into());
        }

        let stored = self.store_with_fresh_id(&file.content)?;
        if stored.media_type.as_deref() != Some(PDF_MEDIA_TYPE) {
            tracing::warn!(
                id = %stored.id,
                filename = %file.filename,
                media_type = stored.media_type.as_deref().unwrap_or("unknown"),
                "uploaded content does not look like a PDF"
            );
        }

        let date = stored.stored_at.format(RECORD_DATE_FORMAT).to_string();
        let record = DocumentRecord {
            name,
            file_path: stored.id.to_string(),
            date: date.clone(),
        };

        if let Err(upload_error) = self.metadata.append(record) {
            tracing::error!(id = %stored.id, "metadata append failed, removing stored file");
            return match self.files.remove(&stored.id) {
                Ok(()) => Err(upload_error),
                Err(cleanup_error) => Err(DocumentError::CleanupAfterUploadFailed {
                    path: stored.path,
                    upload_error: Box::new(upload_error),
                    cleanup_error,
                }),
            };
        }

        tracing::info!(id = %stored.id, size_bytes = stored.size_bytes, "document uploaded");

        Ok(UploadedDocument {
            id: stored.id,
            file_path: stored.path,
            date,
        })
    }

    /// Returns every record verbatim.
    ///
    /// # Errors
    ///
    /// `NotFoundError::NoDocuments` if the metadata store has never been written, or a read
    /// or parse failure.
    pub fn list(&self) -> DocumentResult<Vec<DocumentRecord>> {
        if !self.metadata.exists() {
            return Err(NotFoundError::NoDocuments.into());
        }
        self.metadata.load()
    }

    /// Reads the stored file for `identifier`.
    ///
    /// Only the file is consulted, so a file without a record is still downloadable.
    ///
    /// # Errors
    ///
    /// `NotFoundError::File` if `identifier` is malformed or has no stored file.
    pub fn download(&self, identifier: &str) -> DocumentResult<DownloadedDocument> {
        let id = parse_identifier(identifier)?;
        let content = self.files.read(&id)?;

        Ok(DownloadedDocument {
            id,
            file_name: id.file_name(PDF_EXTENSION),
            content,
        })
    }

    /// Removes the stored file for `identifier`, then every record carrying it.
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingFilePath` if `identifier` is `None`
    /// - `NotFoundError::File` if it is malformed or has no stored file (nothing changes)
    /// - any other removal or metadata failure, reported as internal
    pub fn delete(&self, identifier: Option<&str>) -> DocumentResult<()> {
        let identifier = identifier.ok_or(ValidationError::MissingFilePath)?;
        let id = parse_identifier(identifier)?;

        if !self.files.exists(&id) {
            return Err(NotFoundError::File(identifier.to_string()).into());
        }

        self.files.remove(&id)?;

        let removed = if self.metadata.exists() {
            self.metadata.remove_by_file_identifier(identifier)?
        } else {
            0
        };
        if removed == 0 {
            tracing::warn!(%id, "deleted file had no metadata record");
        }

        tracing::info!(%id, records_removed = removed, "document deleted");
        Ok(())
    }

    /// Cross-checks the metadata store against the upload directory.
    pub fn find_orphans(&self) -> DocumentResult<OrphanReport> {
        let records = self.metadata.load()?;
        let stored = self.files.list_ids()?;

        let recorded: HashSet<&str> = records.iter().map(|r| r.file_path.as_str()).collect();

        let files_without_record = stored
            .into_iter()
            .filter(|id| !recorded.contains(id.to_string().as_str()))
            .collect();

        let records_without_file = records
            .iter()
            .filter(|r| match FileId::parse(&r.file_path) {
                Ok(id) => !self.files.exists(&id),
                Err(_) => true,
            })
            .cloned()
            .collect();

        Ok(OrphanReport {
            records_without_file,
            files_without_record,
        })
    }

    /// Writes `content` under a newly generated identifier, retrying on the (pathological)
    /// case that the identifier is already taken.
    fn store_with_fresh_id(&self, content: &[u8]) -> DocumentResult<StoredFile> {
        for _attempt in 0..MAX_ID_ATTEMPTS {
            match self.files.write(&FileId::new(), content) {
                Ok(stored) => return Ok(stored),
                Err(FilesError::FileAlreadyExists(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(DocumentError::IdAllocation(MAX_ID_ATTEMPTS))
    }
}

fn parse_identifier(identifier: &str) -> DocumentResult<FileId> {
    FileId::parse(identifier).map_err(|_| {
        tracing::warn!(identifier, "rejected malformed file identifier");
        NotFoundError::File(identifier.to_string()).into()
    })
}
