use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub unit: String,

    pub quantity: i64,
    pub cost: f64,
    pub barcode: String,

    /// Relative path of the attached image, empty when there is none.
    pub image_url: String,

    /// Low stock is derived (`quantity <= low_stock_threshold`), never stored.
    pub low_stock_threshold: i64,

    /// Ordered `[{key, value}]` pairs.
    #[sea_orm(column_type = "JsonBinary")]
    pub attributes: Json,
    /// Ordered `[{name, SKU, quantity}]` entries.
    #[sea_orm(column_type = "JsonBinary")]
    pub variants: Json,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
