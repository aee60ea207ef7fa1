use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, sea_query::LockType,
};
use uuid::Uuid;

use super::{ItemChanges, ItemStore, NewItem, StoreError, UpdatedItem};
use crate::entity::item;

/// [`ItemStore`] over a SeaORM connection (PostgreSQL or SQLite).
#[derive(Clone)]
pub struct SeaOrmItemStore {
    db: DatabaseConnection,
}

impl SeaOrmItemStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_write_err(err: DbErr, sku: &str) -> StoreError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        StoreError::DuplicateSku(sku.to_string())
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl ItemStore for SeaOrmItemStore {
    async fn insert(&self, item: NewItem) -> Result<item::Model, StoreError> {
        let now = Utc::now();
        let sku = item.sku.clone();

        let model = item::ActiveModel {
            id: Set(Uuid::now_v7()),
            sku: Set(item.sku),
            name: Set(item.name),
            description: Set(item.description),
            unit: Set(item.unit),
            quantity: Set(item.quantity),
            cost: Set(item.cost),
            barcode: Set(item.barcode),
            image_url: Set(item.image_url),
            low_stock_threshold: Set(item.low_stock_threshold),
            attributes: Set(serde_json::to_value(&item.attributes)?),
            variants: Set(serde_json::to_value(&item.variants)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, &sku))
    }

    async fn find_all(&self) -> Result<Vec<item::Model>, StoreError> {
        Ok(item::Entity::find()
            .order_by_asc(item::Column::CreatedAt)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<item::Model>, StoreError> {
        Ok(item::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<item::Model>, StoreError> {
        Ok(item::Entity::find()
            .filter(item::Column::Sku.eq(sku))
            .one(&self.db)
            .await?)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ItemChanges,
    ) -> Result<Option<UpdatedItem>, StoreError> {
        let txn = self.db.begin().await?;

        let Some(existing) = item::Entity::find_by_id(id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };
        let sku = changes.sku.clone().unwrap_or_else(|| existing.sku.clone());
        let previous_image_url = existing.image_url.clone();
        let mut active: item::ActiveModel = existing.into();

        if let Some(v) = changes.sku {
            active.sku = Set(v);
        }
        if let Some(v) = changes.name {
            active.name = Set(v);
        }
        if let Some(v) = changes.description {
            active.description = Set(v);
        }
        if let Some(v) = changes.unit {
            active.unit = Set(v);
        }
        if let Some(v) = changes.quantity {
            active.quantity = Set(v);
        }
        if let Some(v) = changes.cost {
            active.cost = Set(v);
        }
        if let Some(v) = changes.barcode {
            active.barcode = Set(v);
        }
        if let Some(v) = changes.image_url {
            active.image_url = Set(v);
        }
        if let Some(v) = changes.low_stock_threshold {
            active.low_stock_threshold = Set(v);
        }
        if let Some(v) = changes.attributes {
            active.attributes = Set(serde_json::to_value(&v)?);
        }
        if let Some(v) = changes.variants {
            active.variants = Set(serde_json::to_value(&v)?);
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&txn)
            .await
            .map_err(|e| map_write_err(e, &sku))?;
        txn.commit().await?;

        Ok(Some(UpdatedItem {
            item: model,
            previous_image_url,
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<item::Model>, StoreError> {
        let txn = self.db.begin().await?;

        let Some(existing) = item::Entity::find_by_id(id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };
        item::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(Some(existing))
    }

    async fn count_by_image_url(&self, image_url: &str) -> Result<u64, StoreError> {
        Ok(item::Entity::find()
            .filter(item::Column::ImageUrl.eq(image_url))
            .count(&self.db)
            .await?)
    }
}
