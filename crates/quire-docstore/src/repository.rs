//! Collection handle: document writes and query execution.
//!
//! Writes go to a uniquely named temporary file in the collection directory,
//! are synced, and are then moved into place. [`Repository::insert`] links
//! the temporary file to its final name, which fails if the name is taken,
//! so key uniqueness holds even between processes. [`Repository::store`]
//! renames over any existing document instead.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::Config;
use crate::document::Document;
use crate::error::StoreError;
use crate::query::Query;

const MAX_COLLECTION_NAME_LEN: usize = 63;
const MAX_DOCUMENT_ID_LEN: usize = 128;
const DOCUMENT_EXTENSION: &str = "json";

/// Handle on one collection. Creating it performs no I/O.
#[derive(Debug, Clone)]
pub struct Repository {
    name: String,
    dir: PathBuf,
}

impl Repository {
    /// Opens the collection `name` under the configured root.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidCollectionName` if `name` is not 1-63
    /// characters of `[A-Za-z0-9_-]`.
    pub fn new(name: &str, config: &Config) -> Result<Self, StoreError> {
        if !is_valid_key(name, MAX_COLLECTION_NAME_LEN) {
            return Err(StoreError::InvalidCollectionName(name.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
            dir: config.collection_dir(name),
        })
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the collection's documents.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Writes a new document, creating the collection on first use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateKey` if a document with the same id
    /// exists, `StoreError::InvalidDocumentId` for an unusable id, or
    /// `StoreError::Io` on filesystem failure.
    pub fn insert(&self, document: &Document) -> Result<(), StoreError> {
        let target = self.document_path(document.id())?;
        let temp = self.write_temp(document)?;

        let linked = fs::hard_link(&temp, &target);
        self.discard_temp(&temp);

        match linked {
            Ok(()) => {
                tracing::trace!(collection = %self.name, id = document.id(), "inserted document");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StoreError::DuplicateKey {
                collection: self.name.clone(),
                id: document.id().to_owned(),
            }),
            Err(e) => Err(StoreError::io(target)(e)),
        }
    }

    /// Writes a document, replacing any document with the same id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidDocumentId` for an unusable id or
    /// `StoreError::Io` on filesystem failure.
    pub fn store(&self, document: &Document) -> Result<(), StoreError> {
        let target = self.document_path(document.id())?;
        let temp = self.write_temp(document)?;

        if let Err(e) = fs::rename(&temp, &target) {
            self.discard_temp(&temp);
            return Err(StoreError::io(target)(e));
        }
        tracing::trace!(collection = %self.name, id = document.id(), "stored document");
        Ok(())
    }

    /// Reads one document by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidDocumentId`, `StoreError::CorruptDocument`
    /// or `StoreError::Io`.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let path = self.document_path(id)?;
        match fs::read_to_string(&path) {
            Ok(contents) => parse_document(&path, &contents, id).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path)(e)),
        }
    }

    /// Runs `query` against the collection.
    ///
    /// A collection that was never written to yields no documents. Documents
    /// that compare equal under the query's ordering keep id order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CorruptDocument` if a document file does not
    /// hold a JSON object, or `StoreError::Io` on filesystem failure.
    pub fn execute(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let mut documents: Vec<Document> = self
            .document_files()?
            .into_iter()
            .map(|(id, path)| {
                let contents = fs::read_to_string(&path).map_err(StoreError::io(&path))?;
                parse_document(&path, &contents, &id)
            })
            .filter(|document| match document {
                Ok(d) => query.matches(d),
                Err(_) => true,
            })
            .collect::<Result<_, _>>()?;

        documents.sort_by(|a, b| query.compare(a, b));
        tracing::trace!(
            collection = %self.name,
            matched = documents.len(),
            "executed query"
        );
        Ok(documents)
    }

    fn document_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_key(id, MAX_DOCUMENT_ID_LEN) {
            return Err(StoreError::InvalidDocumentId(id.to_owned()));
        }
        Ok(self.dir.join(format!("{id}.{DOCUMENT_EXTENSION}")))
    }

    /// Document files sorted by id. Hidden and temporary files are skipped.
    fn document_files(&self) -> Result<Vec<(String, PathBuf)>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir)(e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(StoreError::io(&self.dir))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            files.push((stem.to_owned(), path));
        }
        files.sort();
        Ok(files)
    }

    fn write_temp(&self, document: &Document) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(StoreError::io(&self.dir))?;

        let bytes = serde_json::to_vec_pretty(&document.to_json())?;
        let temp = self
            .dir
            .join(format!(".{}.{}.tmp", document.id(), Uuid::new_v4().simple()));

        let mut file = File::create(&temp).map_err(StoreError::io(&temp))?;
        file.write_all(&bytes).map_err(StoreError::io(&temp))?;
        file.sync_all().map_err(StoreError::io(&temp))?;
        Ok(temp)
    }

    fn discard_temp(&self, temp: &Path) {
        if let Err(e) = fs::remove_file(temp) {
            tracing::warn!(
                collection = %self.name,
                path = %temp.display(),
                error = %e,
                "could not remove temporary file"
            );
        }
    }
}

fn parse_document(path: &Path, contents: &str, id: &str) -> Result<Document, StoreError> {
    let object: Map<String, Value> =
        serde_json::from_str(contents).map_err(|source| StoreError::CorruptDocument {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Document::from_json(object, id))
}

fn is_valid_key(key: &str, max_len: usize) -> bool {
    !key.is_empty()
        && key.len() <= max_len
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
