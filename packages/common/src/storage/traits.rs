use async_trait::async_trait;

use super::error::StorageError;

/// Accepted image MIME types and the extension stored files receive.
pub const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// File extension for an accepted image MIME type, ignoring case and
/// parameters (`image/PNG; q=1` maps to `png`).
pub fn image_extension(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(allowed, _)| allowed.eq_ignore_ascii_case(essence))
        .map(|(_, ext)| *ext)
}

/// An image received with a create or update request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename as sent by the client.
    pub filename: String,
    /// MIME type declared by the client, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// The declared MIME type, or one guessed from the filename.
    pub fn mime_type(&self) -> String {
        match &self.content_type {
            Some(ct) if !ct.trim().is_empty() => ct.trim().to_string(),
            _ => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

/// Storage for item images.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Store an image and return the relative path it can be referenced by.
    async fn put(&self, upload: &ImageUpload) -> Result<String, StorageError>;

    /// Delete a previously stored image.
    ///
    /// Returns `true` if a file was removed, `false` if nothing was stored at `path`.
    async fn remove(&self, path: &str) -> Result<bool, StorageError>;
}
