use std::path::PathBuf;

use serde::Deserialize;

/// Attachment storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory uploaded images are written to. Default: "./uploads".
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Leading segment of the relative paths handed back to callers, and the
    /// URL prefix the files are served under. Default: "uploads".
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Largest accepted upload in bytes. Default: 5 MB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}
fn default_public_prefix() -> String {
    "uploads".into()
}
fn default_max_upload_size() -> u64 {
    5 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_prefix: default_public_prefix(),
            max_upload_size: default_max_upload_size(),
        }
    }
}
