//! On-disk layout of the artifacts shared by the trainer and the server

use crate::errors::ArtifactError;
use crate::serde_canon::{hash_hex, to_canonical_json};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MODEL_FILE: &str = "house_price_model.json";
pub const MODEL_HASH_FILE: &str = "house_price_model.hash";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const SCHEMA_FILE: &str = "feature_names.json";

/// Paths of the three artifacts the server needs, plus the model hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub model_hash: PathBuf,
    pub encoders: PathBuf,
    pub schema: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside a models directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            model_hash: dir.join(MODEL_HASH_FILE),
            encoders: dir.join(ENCODERS_FILE),
            schema: dir.join(SCHEMA_FILE),
        }
    }
}

/// Write `value` as canonical JSON, creating parent directories.
///
/// Returns the blake3 hex digest of the written bytes.
pub fn write_canonical<T: Serialize, P: AsRef<Path>>(
    path: P,
    value: &T,
) -> Result<String, ArtifactError> {
    let path = path.as_ref();
    let json = to_canonical_json(value)?;
    ensure_parent(path)?;
    fs::write(path, &json).map_err(|e| ArtifactError::io(path, e))?;
    debug!("Wrote {} ({} bytes)", path.display(), json.len());
    Ok(hash_hex(&json))
}

/// Read and deserialize a JSON artifact
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ArtifactError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
    debug!("Read {} ({} bytes)", path.display(), json.len());
    serde_json::from_str(&json).map_err(|e| ArtifactError::json(path, e))
}

/// Create the parent directory of `path` if it has one
pub fn ensure_parent(path: &Path) -> Result<(), ArtifactError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_paths_in_dir() {
        let paths = ArtifactPaths::in_dir("models");
        assert_eq!(paths.model, Path::new("models").join(MODEL_FILE));
        assert_eq!(paths.encoders, Path::new("models").join(ENCODERS_FILE));
        assert_eq!(paths.schema, Path::new("models").join(SCHEMA_FILE));
    }

    #[test]
    fn test_write_read_creates_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("value.json");

        let mut value = BTreeMap::new();
        value.insert("city".to_string(), vec!["Karachi".to_string()]);

        let hash = write_canonical(&path, &value).unwrap();
        assert_eq!(hash.len(), 64);

        let restored: BTreeMap<String, Vec<String>> = read_json(&path).unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = read_json::<Vec<String>, _>(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
