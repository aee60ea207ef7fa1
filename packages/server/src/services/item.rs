use std::sync::Arc;

use common::storage::{AttachmentStore, ImageUpload, StorageError};
use common::{DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_QUANTITY, DEFAULT_UNIT, Item, generate_sku};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ItemError, ItemInput};
use crate::store::{ItemChanges, ItemStore, NewItem};

/// Item lifecycle on top of an [`ItemStore`] and an [`AttachmentStore`].
///
/// Image cleanup after a delete or replacement runs in the background and
/// never fails the request that triggered it.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    attachments: Arc<dyn AttachmentStore>,
}

/// Malformed IDs cannot name a stored item, so they are reported as missing.
fn parse_id(id: &str) -> Result<Uuid, ItemError> {
    Uuid::parse_str(id.trim()).map_err(|_| ItemError::NotFound)
}

fn required(value: Option<String>, field: &str) -> Result<String, ItemError> {
    value.ok_or_else(|| ItemError::Validation(format!("{field} is required")))
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self { store, attachments }
    }

    pub async fn list(&self) -> Result<Vec<Item>, ItemError> {
        let models = self.store.find_all().await?;
        Ok(models.into_iter().map(Item::from).collect())
    }

    pub async fn list_low_stock(&self) -> Result<Vec<Item>, ItemError> {
        let items = self.list().await?;
        Ok(items.into_iter().filter(Item::is_low_stock).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Item, ItemError> {
        let id = parse_id(id)?;
        self.store
            .find_by_id(id)
            .await?
            .map(Item::from)
            .ok_or(ItemError::NotFound)
    }

    pub fn generate_sku(&self, prefix: Option<&str>) -> String {
        generate_sku(prefix.unwrap_or_default())
    }

    pub async fn create(
        &self,
        input: ItemInput,
        image: Option<ImageUpload>,
    ) -> Result<Item, ItemError> {
        let sku = required(input.sku, "SKU")?;
        let name = required(input.name, "name")?;
        self.ensure_sku_available(&sku, None).await?;

        let stored = self.store_image(image.as_ref()).await?;

        let new_item = NewItem {
            sku,
            name,
            description: input.description.unwrap_or_default(),
            unit: input.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            quantity: input.quantity.unwrap_or(DEFAULT_QUANTITY),
            cost: input.cost.unwrap_or_default(),
            barcode: input.barcode.unwrap_or_default(),
            image_url: stored.clone().or(input.image_url).unwrap_or_default(),
            low_stock_threshold: input
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            attributes: input.attributes.unwrap_or_default(),
            variants: input.variants.unwrap_or_default(),
        };

        match self.store.insert(new_item).await {
            Ok(model) => {
                info!(id = %model.id, sku = %model.sku, "Item created");
                Ok(Item::from(model))
            }
            Err(e) => {
                if let Some(path) = stored {
                    self.release_attachment(path);
                }
                Err(e.into())
            }
        }
    }

    pub async fn update(
        &self,
        id: &str,
        input: ItemInput,
        image: Option<ImageUpload>,
    ) -> Result<Item, ItemError> {
        let id = parse_id(id)?;
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ItemError::NotFound)?;

        if let Some(sku) = input.sku.as_deref()
            && sku != existing.sku
        {
            self.ensure_sku_available(sku, Some(id)).await?;
        }

        let stored = self.store_image(image.as_ref()).await?;
        let mut changes = input.into_changes();
        if let Some(path) = &stored {
            changes.image_url = Some(path.clone());
        }

        if changes.is_empty() {
            return Ok(Item::from(existing));
        }

        let updated = self
            .store
            .update(id, changes)
            .await
            .map_err(ItemError::from)
            .and_then(|updated| updated.ok_or(ItemError::NotFound));
        let updated = match updated {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(path) = stored {
                    self.release_attachment(path);
                }
                return Err(e);
            }
        };

        if updated.previous_image_url != updated.item.image_url {
            self.release_attachment(updated.previous_image_url);
        }
        info!(%id, "Item updated");
        Ok(Item::from(updated.item))
    }

    pub async fn update_quantity(&self, id: &str, quantity: i64) -> Result<Item, ItemError> {
        if quantity < 0 {
            return Err(ItemError::Validation("quantity must be >= 0".into()));
        }
        let id = parse_id(id)?;

        let model = self
            .store
            .update(id, ItemChanges::quantity(quantity))
            .await?
            .ok_or(ItemError::NotFound)?
            .item;
        info!(%id, quantity, "Item quantity set");

        Ok(Item::from(model))
    }

    pub async fn delete(&self, id: &str) -> Result<Item, ItemError> {
        let id = parse_id(id)?;
        let model = self.store.delete(id).await?.ok_or(ItemError::NotFound)?;
        info!(%id, sku = %model.sku, "Item deleted");

        self.release_attachment(model.image_url.clone());
        Ok(Item::from(model))
    }

    async fn ensure_sku_available(&self, sku: &str, owner: Option<Uuid>) -> Result<(), ItemError> {
        match self.store.find_by_sku(sku).await? {
            Some(other) if Some(other.id) != owner => Err(ItemError::Conflict(format!(
                "SKU '{sku}' is already in use"
            ))),
            _ => Ok(()),
        }
    }

    async fn store_image(&self, image: Option<&ImageUpload>) -> Result<Option<String>, ItemError> {
        let Some(upload) = image else {
            return Ok(None);
        };
        let path = self.attachments.put(upload).await?;
        debug!(%path, filename = %upload.filename, "Stored attachment");
        Ok(Some(path))
    }

    /// Schedule removal of a stored image once no item refers to it.
    /// Failures are logged and dropped.
    fn release_attachment(&self, path: String) {
        if path.trim().is_empty() {
            return;
        }
        let store = Arc::clone(&self.store);
        let attachments = Arc::clone(&self.attachments);
        tokio::spawn(async move {
            match store.count_by_image_url(&path).await {
                Ok(0) => {}
                Ok(refs) => {
                    debug!(%path, refs, "Attachment still referenced, keeping it");
                    return;
                }
                Err(e) => {
                    warn!(%path, error = %e, "Could not check attachment references, keeping it");
                    return;
                }
            }
            match attachments.remove(&path).await {
                Ok(true) => debug!(%path, "Released attachment"),
                Ok(false) => debug!(%path, "Attachment already gone"),
                // Image URLs set by hand may point outside the upload directory.
                Err(StorageError::InvalidPath(_)) => {
                    debug!(%path, "Not a stored attachment, nothing to release")
                }
                Err(e) => warn!(%path, error = %e, "Failed to release attachment"),
            }
        });
    }
}
