//! Artifact store for trained models
//!
//! Trained artifacts are read-many, write-occasional. Writers replace a whole
//! artifact in one step so a concurrent reader observes either the old or the
//! new artifact, never a partial one. Each artifact is sealed in an envelope
//! carrying a SHA-256 checksum of the payload; an artifact that fails
//! verification is reported as corrupt instead of being used.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{PlannerError, PlannerResult};

/// Durable key to blob persistence with atomic replace
pub trait ArtifactStore: Send + Sync {
    /// Whether an artifact is stored under `key`
    fn exists(&self, key: &str) -> bool;

    /// Read the artifact stored under `key`, if any
    fn get(&self, key: &str) -> PlannerResult<Option<Vec<u8>>>;

    /// Atomically replace the artifact stored under `key`
    fn put(&self, key: &str, bytes: &[u8]) -> PlannerResult<()>;

    /// Human-readable location of `key`, reported after training
    fn location(&self, key: &str) -> String;
}

/// Keys become file names, so only a conservative alphabet is allowed
fn validate_key(key: &str) -> PlannerResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PlannerError::InvalidKey(key.to_string()))
    }
}

/// Artifact store backed by a directory, one JSON file per key
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn io_error(key: &str, source: io::Error) -> PlannerError {
        PlannerError::ArtifactIo {
            key: key.to_string(),
            source,
        }
    }

    fn write_temp(&self, tmp: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(tmp)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl ArtifactStore for FsArtifactStore {
    fn exists(&self, key: &str) -> bool {
        validate_key(key).is_ok() && self.path_for(key).is_file()
    }

    fn get(&self, key: &str) -> PlannerResult<Option<Vec<u8>>> {
        validate_key(key)?;
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> PlannerResult<()> {
        validate_key(key)?;
        fs::create_dir_all(&self.root).map_err(|e| Self::io_error(key, e))?;

        // Temp file in the same directory so the rename stays on one filesystem
        let tmp = self
            .root
            .join(format!(".{key}.{}.tmp", uuid::Uuid::new_v4().simple()));

        let result = self
            .write_temp(&tmp, bytes)
            .and_then(|_| fs::rename(&tmp, self.path_for(key)));

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(Self::io_error(key, e));
        }

        tracing::debug!(key, path = %self.path_for(key).display(), "Artifact replaced");
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}

/// In-process artifact store, used by tests and the WASM preview
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactStore {
    blobs: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn exists(&self, key: &str) -> bool {
        self.blobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    fn get(&self, key: &str) -> PlannerResult<Option<Vec<u8>>> {
        validate_key(key)?;
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.get(key).map(|b| b.as_ref().clone()))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> PlannerResult<()> {
        validate_key(key)?;
        self.blobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), Arc::new(bytes.to_vec()));
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}

/// Envelope written around every artifact payload
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format_version: u32,
    /// Hex SHA-256 of `payload`
    checksum: String,
    /// Payload serialized as JSON text
    payload: String,
}

fn checksum(payload: &str) -> String {
    format!("{:x}", Sha256::digest(payload.as_bytes()))
}

/// Serialize `value` into a checksummed envelope
pub fn seal<T: Serialize>(value: &T, format_version: u32) -> PlannerResult<Vec<u8>> {
    let payload = serde_json::to_string(value)?;
    let envelope = Envelope {
        format_version,
        checksum: checksum(&payload),
        payload,
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// Verify and decode an envelope produced by [`seal`]
pub fn open<T: DeserializeOwned>(
    key: &str,
    bytes: &[u8],
    expected_version: u32,
) -> PlannerResult<T> {
    let decode_error = |source| PlannerError::ArtifactDecode {
        key: key.to_string(),
        source,
    };

    let envelope: Envelope = serde_json::from_slice(bytes).map_err(decode_error)?;
    if envelope.checksum != checksum(&envelope.payload) {
        return Err(PlannerError::CorruptArtifact(key.to_string()));
    }
    if envelope.format_version != expected_version {
        return Err(PlannerError::IncompatibleArtifact {
            key: key.to_string(),
            found: envelope.format_version,
            expected: expected_version,
        });
    }
    serde_json::from_str(&envelope.payload).map_err(decode_error)
}
