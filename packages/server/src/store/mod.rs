//! Persistence contract for items.

mod db;

use async_trait::async_trait;
use common::{Attribute, Variant};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::item;

pub use db::SeaOrmItemStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SKU '{0}' is already in use")]
    DuplicateSku(String),
    #[error("failed to encode item field: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// A fully-populated item ready to be inserted. The store assigns the ID and
/// timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub quantity: i64,
    pub cost: f64,
    pub barcode: String,
    pub image_url: String,
    pub low_stock_threshold: i64,
    pub attributes: Vec<Attribute>,
    pub variants: Vec<Variant>,
}

/// Sparse set of field changes. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<i64>,
    pub cost: Option<f64>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub low_stock_threshold: Option<i64>,
    pub attributes: Option<Vec<Attribute>>,
    pub variants: Option<Vec<Variant>>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }
}

/// Outcome of [`ItemStore::update`]. `previous_image_url` is read under the
/// same row lock as the write.
#[derive(Debug, Clone)]
pub struct UpdatedItem {
    pub item: item::Model,
    pub previous_image_url: String,
}

/// Item persistence. Every operation is atomic for a single record; there
/// are no cross-record transactions.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert(&self, item: NewItem) -> Result<item::Model, StoreError>;

    /// All items, oldest first.
    async fn find_all(&self) -> Result<Vec<item::Model>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<item::Model>, StoreError>;

    async fn find_by_sku(&self, sku: &str) -> Result<Option<item::Model>, StoreError>;

    /// Apply `changes` and bump `updated_at`. `None` if the item does not exist.
    async fn update(
        &self,
        id: Uuid,
        changes: ItemChanges,
    ) -> Result<Option<UpdatedItem>, StoreError>;

    /// Remove an item, returning the removed record. `None` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<Option<item::Model>, StoreError>;

    /// Number of items whose `image_url` is exactly `image_url`.
    async fn count_by_image_url(&self, image_url: &str) -> Result<u64, StoreError>;
}
