use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit of measure assigned when none is given.
pub const DEFAULT_UNIT: &str = "pcs";

/// Quantity assigned when none is given.
pub const DEFAULT_QUANTITY: i64 = 0;

/// Low-stock threshold assigned when none is given.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 0;

/// A free-form `{key, value}` descriptor attached to an item (e.g. color, size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Attribute {
    #[schema(example = "color")]
    pub key: String,
    #[schema(example = "blue")]
    pub value: String,
}

/// A sellable variation of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Variant {
    #[schema(example = "Large")]
    pub name: String,
    #[serde(rename = "SKU", alias = "sku", default)]
    #[schema(example = "WIDGET-L")]
    pub sku: String,
    #[serde(default)]
    pub quantity: i64,
}

/// Wire representation of a stored item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    #[serde(rename = "SKU")]
    #[schema(example = "SKU-1")]
    pub sku: String,
    #[schema(example = "Widget")]
    pub name: String,
    pub description: String,
    #[schema(example = "pcs")]
    pub unit: String,
    pub quantity: i64,
    pub cost: f64,
    pub barcode: String,
    /// Relative path of the attached image, or empty.
    #[schema(example = "uploads/01936f0e-5678-7abc-8000-000000000002.png")]
    pub image_url: String,
    pub low_stock_threshold: i64,
    pub attributes: Vec<Attribute>,
    pub variants: Vec<Variant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_low_stock(&self) -> bool {
        is_low_stock(self.quantity, self.low_stock_threshold)
    }
}

/// An item is low on stock once its quantity falls to or below its threshold.
pub fn is_low_stock(quantity: i64, threshold: i64) -> bool {
    quantity <= threshold
}
