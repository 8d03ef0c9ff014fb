//! Loading documents from a directory

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::chunk::Document;
use crate::{Error, Result};

/// Read every file in `dir` (not recursive) whose extension is `extension`.
///
/// The file name becomes the document id. Documents are returned sorted by id
/// so chunk ids come out the same on every run.
pub fn load_documents(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    let extension = extension.trim_start_matches('.');
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let id = entry.file_name().to_string_lossy().into_owned();
        debug!(document = %id, bytes = text.len(), "loaded document");
        documents.push(Document { id, text });
    }
    documents.sort_by(|a, b| a.id.cmp(&b.id));

    info!(dir = %dir.display(), documents = documents.len(), "loaded documents");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let docs = load_documents(dir.path(), "txt").unwrap();

        assert_eq!(
            docs,
            vec![Document::new("a.txt", "first"), Document::new("b.txt", "second")]
        );
    }

    #[test]
    fn test_leading_dot_in_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();

        assert_eq!(load_documents(dir.path(), ".txt").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_file_is_a_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();

        let docs = load_documents(dir.path(), "txt").unwrap();
        assert_eq!(docs, vec![Document::new("empty.txt", "")]);
    }

    #[test]
    fn test_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = load_documents(&missing, "txt").unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
