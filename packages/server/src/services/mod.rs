pub mod input;
pub mod item;

use common::storage::StorageError;
use thiserror::Error;

use crate::store::StoreError;

pub use input::{ItemInput, decode_quantity};
pub use item::ItemService;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("{0}")]
    Validation(String),
    #[error("Item not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Attachment(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for ItemError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSku(_) => ItemError::Conflict(err.to_string()),
            other => ItemError::Storage(other.to_string()),
        }
    }
}

impl From<StorageError> for ItemError {
    fn from(err: StorageError) -> Self {
        if err.is_rejection() {
            ItemError::Attachment(err.to_string())
        } else {
            ItemError::Storage(err.to_string())
        }
    }
}
