use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::error::StorageError;
use super::filename::validate_flat_filename;
use super::traits::{AttachmentStore, ImageUpload, image_extension};
use crate::config::StorageConfig;

/// Filesystem-backed attachment store.
///
/// Images are written flat into `{base_path}/{uuid}.{ext}` and referenced by
/// callers as `{public_prefix}/{uuid}.{ext}`.
pub struct FilesystemAttachmentStore {
    base_path: PathBuf,
    public_prefix: String,
    max_size: u64,
}

impl FilesystemAttachmentStore {
    /// Create the store, creating the upload directory if needed.
    pub async fn new(
        base_path: PathBuf,
        public_prefix: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_prefix: public_prefix.into().trim_matches('/').to_string(),
            max_size,
        })
    }

    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::new(
            config.upload_dir.clone(),
            config.public_prefix.clone(),
            config.max_upload_size,
        )
        .await
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a relative attachment path back to a file inside the upload directory.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let path = path.trim().replace('\\', "/");
        let name = path
            .strip_prefix(&self.public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::InvalidPath(path.clone()))?;
        let name = validate_flat_filename(name)
            .map_err(|e| StorageError::InvalidPath(format!("{path}: {}", e.message())))?;
        Ok(self.base_path.join(name))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl AttachmentStore for FilesystemAttachmentStore {
    async fn put(&self, upload: &ImageUpload) -> Result<String, StorageError> {
        let mime = upload.mime_type();
        let ext = image_extension(&mime).ok_or(StorageError::UnsupportedMediaType(mime))?;

        let size = upload.data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let name = format!("{}.{ext}", uuid::Uuid::now_v7());
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &upload.data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, self.base_path.join(&name)).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(original = %upload.filename, stored = %name, size, "Stored attachment");
        Ok(format!("{}/{name}", self.public_prefix))
    }

    async fn remove(&self, path: &str) -> Result<bool, StorageError> {
        let file = self.resolve(path)?;
        match fs::remove_file(&file).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
