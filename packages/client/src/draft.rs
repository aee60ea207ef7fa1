use common::{Attribute, Variant};
use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::error::ClientResult;

/// Fields sent with a create or update. `None` fields are omitted, which the
/// server treats as "default" on create and "unchanged" on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(rename = "SKU", skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Variant>>,
}

impl ItemDraft {
    /// A draft carrying only the two required fields.
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku: Some(sku.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// The draft as multipart text fields. Lists are JSON-encoded.
    pub fn form_fields(&self) -> ClientResult<Vec<(&'static str, String)>> {
        let mut fields = Vec::new();
        let mut text = |name: &'static str, value: Option<String>| {
            if let Some(v) = value {
                fields.push((name, v));
            }
        };

        text("SKU", self.sku.clone());
        text("name", self.name.clone());
        text("description", self.description.clone());
        text("unit", self.unit.clone());
        text("quantity", self.quantity.map(|q| q.to_string()));
        text("cost", self.cost.map(|c| c.to_string()));
        text("barcode", self.barcode.clone());
        text("imageUrl", self.image_url.clone());
        text(
            "lowStockThreshold",
            self.low_stock_threshold.map(|t| t.to_string()),
        );

        if let Some(attributes) = &self.attributes {
            fields.push(("attributes", serde_json::to_string(attributes)?));
        }
        if let Some(variants) = &self.variants {
            fields.push(("variants", serde_json::to_string(variants)?));
        }
        Ok(fields)
    }

    pub(crate) fn to_form(&self, image: ImageFile) -> ClientResult<Form> {
        let form = self
            .form_fields()?
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        Ok(form.part("image", image.into_part()?))
    }
}

/// An image to upload alongside a create or update.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    fn into_part(self) -> ClientResult<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(&self.content_type)?)
    }
}
