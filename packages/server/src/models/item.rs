use common::{Attribute, Item, Variant};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::entity::item;

impl From<item::Model> for Item {
    fn from(m: item::Model) -> Self {
        let id = m.id.to_string();
        let attributes = decode_list::<Attribute>(m.attributes, &id, "attributes");
        let variants = decode_list::<Variant>(m.variants, &id, "variants");
        Self {
            id,
            sku: m.sku,
            name: m.name,
            description: m.description,
            unit: m.unit,
            quantity: m.quantity,
            cost: m.cost,
            barcode: m.barcode,
            image_url: m.image_url,
            low_stock_threshold: m.low_stock_threshold,
            attributes,
            variants,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Decode a stored JSON list column. Rows written outside the service can hold
/// anything, so a bad value is logged and read as empty.
fn decode_list<T: DeserializeOwned>(value: serde_json::Value, id: &str, column: &str) -> Vec<T> {
    if value.is_null() {
        return Vec::new();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(item_id = %id, column, error = %e, "Malformed stored list, returning empty");
        Vec::new()
    })
}

/// Item fields accepted by create and update.
///
/// Sent either as a JSON object or as `multipart/form-data` text fields, in
/// which case `attributes` and `variants` are JSON-encoded strings and the
/// image goes in a file field named `image`. Every field may be omitted on
/// update.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ItemRequest {
    #[serde(rename = "SKU")]
    #[schema(example = "SKU-1")]
    pub sku: Option<String>,
    #[schema(example = "Widget")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(example = "pcs")]
    pub unit: Option<String>,
    #[schema(example = 3)]
    pub quantity: Option<i64>,
    #[schema(example = 2.5)]
    pub cost: Option<f64>,
    pub barcode: Option<String>,
    /// Ignored when an `image` file is uploaded.
    pub image_url: Option<String>,
    #[schema(example = 5)]
    pub low_stock_threshold: Option<i64>,
    pub attributes: Option<Vec<Attribute>>,
    pub variants: Option<Vec<Variant>>,
}

/// Body of a quantity-only update.
#[derive(Deserialize, utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UpdateQuantityRequest {
    /// New on-hand quantity (non-negative whole number).
    #[schema(example = 0)]
    pub quantity: i64,
}

/// Query parameters for SKU suggestion.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SkuQuery {
    /// Prefix for the generated SKU. Defaults to `ITEM`.
    #[param(example = "SHOE")]
    pub prefix: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SkuSuggestion {
    #[schema(example = "SHOE-LOYW3V28")]
    pub sku: String,
}
