//! File-backed storage
//!
//! The storage root mirrors the collection hierarchy as nested
//! directories. Each document is one `<identifier>.json` file holding its
//! pretty-printed JSON. Writes land in a hidden temporary file that is
//! renamed over the target, so readers never see a partial document.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::constants::{DOCUMENT_EXTENSION, ID_FIELD};
use crate::storage::{CollectionListing, CollectionPath, DocumentStorage};
use crate::types::{Document, DocumentId, Result, StorageError};
use crate::{log_debug, log_error, log_trace};

/// Whether an I/O error means nothing exists at the path: the file is
/// missing, an ancestor is a plain file, the target is a directory, or a
/// segment is too long to ever have been written.
fn is_absent(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::IsADirectory | ErrorKind::InvalidFilename
    )
}

/// Storage implementation over a directory tree
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory every collection path is resolved against
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`. The directory is created lazily
    /// on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of a collection
    fn location(&self, collection: &CollectionPath) -> PathBuf {
        let mut path = self.root.clone();
        for segment in collection.segments() {
            path.push(segment);
        }
        path
    }

    /// Filesystem location of a document
    fn document_path(&self, collection: &CollectionPath, id: &DocumentId) -> PathBuf {
        self.location(collection)
            .join(format!("{}.{}", id, DOCUMENT_EXTENSION))
    }

    /// Whether a directory entry name looks like a persisted document
    fn is_document_name(name: &str) -> bool {
        !name.starts_with('.')
            && Path::new(name).extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION)
    }

    /// Read and decode one document file. `Ok(None)` if it vanished.
    fn load(path: &Path) -> Result<Option<Document>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(StorageError::io(path, e).into()),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(fields)) => Ok(Some(Document::from_fields(fields))),
            Ok(_) => Err(StorageError::corruption(path, "document is not a JSON object").into()),
            Err(e) => Err(StorageError::corruption(path, e.to_string()).into()),
        }
    }

    /// Load a document and force its `id` to the filename stem
    fn load_with_file_id(path: &Path) -> Result<Option<Document>> {
        let Some(document) = Self::load(path)? else {
            return Ok(None);
        };
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let id = match stem.parse::<DocumentId>() {
            Ok(id) => id.to_string(),
            Err(_) => stem.to_string(),
        };

        let mut fields = document.into_fields();
        fields.insert(ID_FIELD.to_string(), Value::String(id));
        Ok(Some(Document::from_fields(fields)))
    }

    /// Load every document in a collection directory, in filename order
    fn load_directory(dir: &Path) -> Result<Vec<Document>> {
        let entries = fs::read_dir(dir).map_err(|e| StorageError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if Self::is_document_name(name) && entry.path().is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::load_with_file_id(&path)? {
                Some(document) => documents.push(document),
                // Deleted between the directory read and the file read
                None => log_debug!("Document disappeared during scan: {:?}", path),
            }
        }
        Ok(documents)
    }
}

impl DocumentStorage for FileStorage {
    fn scan(&self, collection: &CollectionPath) -> Result<CollectionListing> {
        let location = self.location(collection);
        log_trace!("Scanning collection location {:?}", location);

        match fs::metadata(&location) {
            Ok(meta) if meta.is_dir() => {
                Ok(CollectionListing::Populated(Self::load_directory(&location)?))
            }
            Ok(_) => {
                let is_document = location
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(Self::is_document_name);
                if !is_document {
                    return Ok(CollectionListing::NotADirectory);
                }
                match Self::load(&location)? {
                    Some(document) => Ok(CollectionListing::Singleton(document)),
                    None => Ok(CollectionListing::Missing),
                }
            }
            Err(e) if is_absent(&e) => {
                if collection.is_root() {
                    return Ok(CollectionListing::Missing);
                }
                // `/settings` may address a standalone `settings.json`
                let mut file_name = location.file_name().unwrap_or_default().to_os_string();
                file_name.push(".");
                file_name.push(DOCUMENT_EXTENSION);
                let singleton = location.with_file_name(file_name);
                if !singleton.is_file() {
                    return Ok(CollectionListing::Missing);
                }
                match Self::load(&singleton)? {
                    Some(document) => Ok(CollectionListing::Singleton(document)),
                    None => Ok(CollectionListing::Missing),
                }
            }
            Err(e) => {
                log_error!("Failed to inspect {:?}: {}", location, e);
                Err(StorageError::io(location, e).into())
            }
        }
    }

    fn read(&self, collection: &CollectionPath, id: &DocumentId) -> Result<Option<Document>> {
        let path = self.document_path(collection, id);
        let document = Self::load(&path)?;
        Ok(document.map(|mut doc| {
            doc.set_id(id);
            doc
        }))
    }

    fn write(&self, collection: &CollectionPath, id: &DocumentId, document: &Document) -> Result<()> {
        let dir = self.location(collection);
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

        let bytes = serde_json::to_vec_pretty(document).map_err(StorageError::from)?;
        let target = self.document_path(collection, id);
        // Unique per write so concurrent writers never share a temp file
        let temp = dir.join(format!(".{}.{}.tmp", id, uuid::Uuid::new_v4().simple()));

        fs::write(&temp, &bytes).map_err(|e| StorageError::io(&temp, e))?;
        if let Err(e) = fs::rename(&temp, &target) {
            let _ = fs::remove_file(&temp);
            return Err(StorageError::io(&target, e).into());
        }

        log_trace!("Wrote {} bytes to {:?}", bytes.len(), target);
        Ok(())
    }

    fn remove(&self, collection: &CollectionPath, id: &DocumentId) -> Result<bool> {
        let path = self.document_path(collection, id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(StorageError::io(path, e).into()),
        }
    }
}
