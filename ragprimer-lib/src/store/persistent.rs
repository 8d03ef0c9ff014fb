use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chunk::Chunk;
use crate::embed::Embedding;
use crate::store::{MemoryStore, Record, SearchResult, VectorStore};
use crate::{Error, Result};

#[derive(Serialize, Deserialize)]
struct CollectionFile {
    collection: String,
    records: Vec<Record>,
}

#[derive(Serialize)]
struct CollectionFileRef<'a> {
    collection: &'a str,
    records: Vec<&'a Record>,
}

/// Named collection persisted as a JSON file under a directory.
///
/// Opening a collection that does not exist yet creates it empty. Every
/// mutation rewrites `{dir}/{collection}.json`.
#[derive(Debug)]
pub struct PersistentStore {
    name: String,
    path: PathBuf,
    inner: MemoryStore,
}

impl PersistentStore {
    /// Open or create the collection `name` under `dir`.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        validate_collection_name(name)?;
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        let path = dir.join(format!("{name}.json"));

        let inner = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            let file: CollectionFile = serde_json::from_str(&raw).map_err(|e| {
                Error::Store(format!("corrupt collection file {}: {e}", path.display()))
            })?;
            MemoryStore::from_records(file.records)
        } else {
            MemoryStore::new()
        };
        info!(
            collection = name,
            path = %path.display(),
            records = inner.len(),
            "opened collection"
        );

        Ok(Self {
            name: name.to_string(),
            path,
            inner,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `next` to disk, then make it the live record set.
    fn commit(&mut self, next: MemoryStore) -> Result<()> {
        self.save(&next)?;
        self.inner = next;
        Ok(())
    }

    fn save(&self, records: &MemoryStore) -> Result<()> {
        let file = CollectionFileRef {
            collection: &self.name,
            records: records.records(),
        };
        let json = serde_json::to_string(&file)
            .map_err(|e| Error::Store(format!("failed to serialize collection: {e}")))?;

        // replace atomically so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::io(&self.path, e))?;
        debug!(collection = %self.name, records = records.len(), "saved collection");
        Ok(())
    }
}

fn validate_collection_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "collection name {name:?} must be non-empty ASCII letters, digits, '_', '-' or '.'"
        )))
    }
}

impl VectorStore for PersistentStore {
    fn upsert(&mut self, chunks: &[Chunk], embeddings: &[Embedding]) -> Result<()> {
        // memory only changes once the file write has gone through
        let mut next = self.inner.clone();
        next.upsert(chunks, embeddings)?;
        self.commit(next)
    }

    fn query(&self, query_embedding: &Embedding, k: usize) -> Result<Vec<SearchResult>> {
        self.inner.query(query_embedding, k)
    }

    fn get(&self, id: &str) -> Option<Chunk> {
        self.inner.get(id)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn clear(&mut self) -> Result<()> {
        self.commit(MemoryStore::new())
    }
}
