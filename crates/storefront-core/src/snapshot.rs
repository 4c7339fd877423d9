//! JSON snapshots of record collections.
//!
//! A snapshot file holds one JSON array of records. Saves go through a
//! sibling temp file and a rename so readers never see a half-written array.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorefrontError};
use crate::record::Collection;

impl<R: DeserializeOwned> Collection<R> {
    /// Decode a collection from a JSON array.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<R> = serde_json::from_str(json)?;
        Ok(Collection::new(records))
    }
}

impl<R: Serialize> Collection<R> {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Snapshot path for a record kind inside a data directory.
pub fn snapshot_path(data_dir: &Path, kind: &str) -> PathBuf {
    data_dir.join(format!("{}.json", kind))
}

/// Read a snapshot. A missing file is an empty collection.
pub fn load<R: DeserializeOwned>(path: &Path) -> Result<Collection<R>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "snapshot missing, starting empty");
            return Ok(Collection::empty());
        }
        Err(err) => return Err(err.into()),
    };

    let records = Collection::from_json_str(&json).map_err(|err| {
        StorefrontError::Snapshot(format!("{}: {}", path.display(), err))
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "snapshot loaded");
    Ok(records)
}

/// Write a snapshot atomically, creating the parent directory if needed.
pub fn save<R: Serialize>(path: &Path, records: &Collection<R>) -> Result<()> {
    let mut json = records.to_json_pretty()?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_atomic(path, json.as_bytes())?;
    tracing::debug!(path = %path.display(), records = records.len(), "snapshot saved");
    Ok(())
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| StorefrontError::Io(format!("Invalid snapshot path: {}", path.display())))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| StorefrontError::Io(format!("System time error: {}", e)))?
        .as_nanos();
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", filename, nanos));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;
    if let Err(err) = file.write_all(data).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    drop(file);

    replace_file(&temp_path, path)?;
    Ok(())
}

/// Move `temp_path` over `destination`.
///
/// Some platforms refuse to rename onto an existing file; the destination is
/// then removed and the rename retried. The temp file is removed if both
/// attempts fail.
fn replace_file(temp_path: &Path, destination: &Path) -> io::Result<()> {
    let Err(first) = fs::rename(temp_path, destination) else {
        return Ok(());
    };
    let _ = fs::remove_file(destination);
    fs::rename(temp_path, destination).map_err(|retry| {
        let _ = fs::remove_file(temp_path);
        io::Error::new(
            retry.kind(),
            format!("Snapshot replace failed (first: {}, retry: {})", first, retry),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        id: String,
    }

    fn tags(ids: &[&str]) -> Collection<Tag> {
        ids.iter().map(|id| Tag { id: id.to_string() }).collect()
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = tempdir().unwrap();
        let loaded: Collection<Tag> = load(&dir.path().join("tags.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = snapshot_path(dir.path(), "tags");
        save(&path, &tags(&["a", "b"])).unwrap();

        let loaded: Collection<Tag> = load(&path).unwrap();
        assert_eq!(loaded, tags(&["a", "b"]));
    }

    #[test]
    fn test_save_replaces_and_cleans_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tags.json");
        save(&path, &tags(&["a"])).unwrap();
        save(&path, &tags(&["b", "c"])).unwrap();

        let loaded: Collection<Tag> = load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_malformed_snapshot_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tags.json");
        fs::write(&path, "{not an array").unwrap();

        let err = load::<Tag>(&path).unwrap_err();
        assert!(matches!(err, StorefrontError::Snapshot(ref msg) if msg.contains("tags.json")));
    }

    #[test]
    fn test_from_json_str_rejects_objects() {
        assert!(Collection::<Tag>::from_json_str(r#"{"id":"a"}"#).is_err());
    }
}
