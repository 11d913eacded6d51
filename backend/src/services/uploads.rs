//! Image upload storage

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// An image received in a multipart form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// File name supplied by the client
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stored name for an upload: a random id keeping the client's extension
pub fn stored_file_name(original: &str) -> String {
    let extension = Path::new(original)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "jpg".to_string());
    format!("{}.{}", Uuid::new_v4().simple(), extension)
}

/// Write an upload under `dir` and return its path
pub async fn save_upload(dir: &Path, image: &UploadedImage) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::StorageError(format!("Cannot create upload directory: {}", e)))?;

    let path = dir.join(stored_file_name(&image.file_name));
    tokio::fs::write(&path, &image.bytes)
        .await
        .map_err(|e| AppError::StorageError(format!("Cannot store upload: {}", e)))?;

    tracing::debug!(path = %path.display(), bytes = image.bytes.len(), "Upload stored");
    Ok(path)
}
