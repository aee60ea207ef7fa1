use thiserror::Error;

/// Errors that can occur while storing or removing attachments.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The declared MIME type is not an accepted image type.
    #[error("unsupported file type '{0}': only JPEG, PNG and WebP images are accepted")]
    UnsupportedMediaType(String),
    /// The upload exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The path does not name a file inside the attachment namespace.
    #[error("invalid attachment path: {0}")]
    InvalidPath(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the error was caused by the upload itself rather than by the
    /// storage backend.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
