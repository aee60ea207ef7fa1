//! Decoding of raw create/update payloads.
//!
//! JSON bodies and multipart forms both arrive as a flat map of field values.
//! Multipart values are always text, so numbers may be numeric strings and
//! list fields may be JSON-encoded arrays. A field that is absent, `null` or
//! an empty string decodes to `None`, which means "use the default" on create
//! and "leave unchanged" on update.

use common::{Attribute, Variant};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ItemError;
use crate::store::ItemChanges;

/// Decoded, validated item fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemInput {
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

impl ItemInput {
    /// Decode a raw field map. Unknown keys such as `id` or `createdAt` are ignored.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ItemError> {
        Ok(Self {
            sku: field(fields, &["SKU", "sku"])
                .map(|v| text("SKU", v, true))
                .transpose()?,
            name: field(fields, &["name"])
                .map(|v| text("name", v, true))
                .transpose()?,
            description: field(fields, &["description"])
                .map(|v| text("description", v, false))
                .transpose()?,
            unit: field(fields, &["unit"])
                .map(|v| text("unit", v, true))
                .transpose()?,
            quantity: field(fields, &["quantity"])
                .map(|v| count("quantity", v))
                .transpose()?,
            cost: field(fields, &["cost"])
                .map(|v| amount("cost", v))
                .transpose()?,
            barcode: field(fields, &["barcode"])
                .map(|v| text("barcode", v, true))
                .transpose()?,
            image_url: field(fields, &["imageUrl", "image_url"])
                .map(|v| text("imageUrl", v, true))
                .transpose()?,
            low_stock_threshold: field(fields, &["lowStockThreshold", "low_stock_threshold"])
                .map(|v| count("lowStockThreshold", v))
                .transpose()?,
            attributes: field(fields, &["attributes"])
                .map(|v| list("attributes", v).and_then(clean_attributes))
                .transpose()?,
            variants: field(fields, &["variants"])
                .map(|v| list("variants", v).and_then(clean_variants))
                .transpose()?,
        })
    }

    pub fn into_changes(self) -> ItemChanges {
        ItemChanges {
            sku: self.sku,
            name: self.name,
            description: self.description,
            unit: self.unit,
            quantity: self.quantity,
            cost: self.cost,
            barcode: self.barcode,
            image_url: self.image_url,
            low_stock_threshold: self.low_stock_threshold,
            attributes: self.attributes,
            variants: self.variants,
        }
    }
}

/// Decode the body of a quantity-only update.
pub fn decode_quantity(value: Option<&Value>) -> Result<i64, ItemError> {
    match value {
        Some(v) if !is_blank(v) => count("quantity", v),
        _ => Err(ItemError::Validation("quantity is required".into())),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn field<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| fields.get(*name))
        .filter(|v| !is_blank(v))
}

fn text(name: &str, value: &Value, trim: bool) -> Result<String, ItemError> {
    match value {
        Value::String(s) if trim => Ok(s.trim().to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ItemError::Validation(format!("{name} must be a string"))),
    }
}

/// A non-negative whole number (`3`, `3.0` or `"3"`).
fn count(name: &str, value: &Value) -> Result<i64, ItemError> {
    let n = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole))
            .ok_or_else(|| ItemError::Validation(format!("{name} must be a whole number")))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
                .ok_or_else(|| ItemError::Validation(format!("{name} must be a whole number")))?
        }
        _ => return Err(ItemError::Validation(format!("{name} must be a number"))),
    };

    if n < 0 {
        return Err(ItemError::Validation(format!("{name} must be >= 0")));
    }
    Ok(n)
}

fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// A finite, non-negative number.
fn amount(name: &str, value: &Value) -> Result<f64, ItemError> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| ItemError::Validation(format!("{name} must be a number")))?;

    if n < 0.0 {
        return Err(ItemError::Validation(format!("{name} must be >= 0")));
    }
    Ok(n)
}

/// A JSON array, given either directly or as JSON-encoded text.
fn list<T: DeserializeOwned>(name: &str, value: &Value) -> Result<Vec<T>, ItemError> {
    let decoded = match value {
        Value::String(s) => serde_json::from_str(s),
        Value::Array(_) => serde_json::from_value(value.clone()),
        _ => return Err(ItemError::Validation(format!("{name} must be a list"))),
    };
    decoded.map_err(|e| ItemError::Validation(format!("{name} is malformed: {e}")))
}

fn clean_attributes(attributes: Vec<Attribute>) -> Result<Vec<Attribute>, ItemError> {
    attributes
        .into_iter()
        .enumerate()
        .map(|(i, attr)| {
            let key = attr.key.trim();
            let value = attr.value.trim();
            if key.is_empty() || value.is_empty() {
                return Err(ItemError::Validation(format!(
                    "attributes[{i}] requires both key and value"
                )));
            }
            Ok(Attribute {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn clean_variants(variants: Vec<Variant>) -> Result<Vec<Variant>, ItemError> {
    variants
        .into_iter()
        .enumerate()
        .map(|(i, variant)| {
            let name = variant.name.trim();
            if name.is_empty() {
                return Err(ItemError::Validation(format!("variants[{i}] requires a name")));
            }
            if variant.quantity < 0 {
                return Err(ItemError::Validation(format!(
                    "variants[{i}].quantity must be >= 0"
                )));
            }
            Ok(Variant {
                name: name.to_string(),
                sku: variant.sku.trim().to_string(),
                quantity: variant.quantity,
            })
        })
        .collect()
}
