//! Serializes the finished index to a single JSON file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::records::Record;

/// Run metadata stored next to the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub total_chunks: usize,
    pub embedding_dim: usize,
}

/// The output artifact: records in order plus run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub records: Vec<Record>,
    pub metadata: Metadata,
}

/// Writes `index` as pretty JSON to `path`, creating parent directories.
///
/// The JSON goes to a sibling temp file first and is renamed over `path`, so readers
/// never see a half-written index.
pub fn write_index(path: &Path, index: &Index) -> Result<(), WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir(parent.to_path_buf(), e))?;
    }
    let tmp = temp_path(path);
    let json = serde_json::to_vec_pretty(index)?;
    let mut file = fs::File::create(&tmp).map_err(|e| WriteError::Write(tmp.clone(), e))?;
    if let Err(e) = file.write_all(&json).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(&tmp);
        return Err(WriteError::Write(tmp, e));
    }
    drop(file);
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(WriteError::Write(path.to_path_buf(), e));
    }
    tracing::info!(path = %path.display(), chunks = index.records.len(), "wrote index");
    Ok(())
}

/// Reads an index written by [`write_index`].
pub fn read_index(path: &Path) -> Result<Index, WriteError> {
    let bytes = fs::read(path).map_err(|e| WriteError::Read(path.to_path_buf(), e))?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Index {
        Index {
            records: vec![Record {
                id: "Alpha Beta__chunk_0".into(),
                book: "Alpha Beta".into(),
                chunk_id: 0,
                text: "hello".into(),
                pages: [1, 1],
                source: "Alpha Beta.pdf#pp.1-1".into(),
                embedding: vec![0.5, -0.25],
            }],
            metadata: Metadata {
                model: "all-minilm".into(),
                chunk_size: 1200,
                chunk_overlap: 200,
                total_chunks: 1,
                embedding_dim: 2,
            },
        }
    }

    #[test]
    fn creates_parent_dirs_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web").join("public").join("index.json");
        write_index(&path, &sample()).unwrap();

        assert!(path.is_file());
        assert!(!temp_path(&path).exists());
        assert_eq!(read_index(&path).unwrap(), sample());
    }

    #[test]
    fn json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        write_index(&path, &sample()).unwrap();

        let v: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let rec = &v["records"][0];
        assert_eq!(rec["id"], "Alpha Beta__chunk_0");
        assert_eq!(rec["chunk_id"], 0);
        assert_eq!(rec["pages"], serde_json::json!([1, 1]));
        assert_eq!(rec["embedding"].as_array().unwrap().len(), 2);
        assert_eq!(v["metadata"]["chunk_overlap"], 200);
        assert_eq!(v["metadata"]["embedding_dim"], 2);
    }

    #[test]
    fn overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, b"stale").unwrap();
        write_index(&path, &sample()).unwrap();
        assert_eq!(read_index(&path).unwrap().metadata.total_chunks, 1);
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the output path makes the rename fail.
        let path = dir.path().join("index.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), b"x").unwrap();

        let err = write_index(&path, &sample()).unwrap_err();
        assert!(matches!(err, WriteError::Write(..)));
        assert!(!temp_path(&path).exists());
        assert!(path.join("occupant").is_file());
    }

    #[test]
    fn write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let err = write_index(&blocker.join("index.json"), &sample()).unwrap_err();
        assert!(matches!(err, WriteError::CreateDir(..)));
    }
}
