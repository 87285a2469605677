//! Metadata store.
//!
//! All document records live in one JSON file: an array of `{name, filePath, date}` objects,
//! pretty-printed with four-space indentation, anything outside printable ASCII escaped as
//! `\uXXXX`, and no trailing newline. Existing `metadata.json` files written by earlier
//! deployments are read and rewritten byte-for-byte in the same shape.
//!
//! Every mutation is a whole-file read-modify-write. Mutations are serialised through a
//! per-store mutex, so concurrent appends and removals within one process cannot lose
//! updates. The rewritten file is staged next to the target and renamed into place.

use crate::constants::METADATA_INDENT;
use crate::{DocumentError, DocumentResult};
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// One uploaded document as recorded in the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Display name supplied by the uploader. Not unique.
    pub name: String,
    /// File identifier (the stored filename without `.pdf`).
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// Upload date, `dd/mm/yyyy`.
    pub date: String,
}

/// File-backed store of [`DocumentRecord`]s.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store file has ever been written.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Returns every record in store order, or an empty list if the store file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::MetadataRead` if the file cannot be read and
    /// `DocumentError::Deserialization` if it is not a JSON array of records.
    pub fn load(&self) -> DocumentResult<Vec<DocumentRecord>> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DocumentError::MetadataRead(e)),
        };

        serde_json::from_slice(&contents).map_err(DocumentError::Deserialization)
    }

    /// Returns the records whose identifier equals `file_path`.
    pub fn find(&self, file_path: &str) -> DocumentResult<Vec<DocumentRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| r.file_path == file_path)
            .collect())
    }

    /// Appends one record and rewrites the store.
    pub fn append(&self, record: DocumentRecord) -> DocumentResult<()> {
        let _guard = self.lock()?;

        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }

    /// Drops every record whose identifier equals `file_path` and rewrites the store.
    ///
    /// Returns how many records were removed. The store is rewritten even when nothing matched,
    /// which also creates it if it was missing.
    pub fn remove_by_file_identifier(&self, file_path: &str) -> DocumentResult<usize> {
        let _guard = self.lock()?;

        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.file_path != file_path);
        let removed = before - records.len();

        self.save(&records)?;
        Ok(removed)
    }

    fn lock(&self) -> DocumentResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| DocumentError::LockPoisoned)
    }

    fn save(&self, records: &[DocumentRecord]) -> DocumentResult<()> {
        let bytes = to_store_bytes(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(DocumentError::MetadataWrite)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let staged = fs::File::create(&tmp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = staged.and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(DocumentError::MetadataWrite(e));
        }

        Ok(())
    }
}

/// Serialises records exactly as the store file is laid out on disk.
pub fn to_store_bytes(records: &[DocumentRecord]) -> DocumentResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new());
    records
        .serialize(&mut ser)
        .map_err(DocumentError::Serialization)?;
    Ok(buf)
}

/// `PrettyFormatter` that additionally escapes every non-ASCII character as `\uXXXX`
/// (UTF-16 code units, lowercase hex).
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(METADATA_INDENT),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}
