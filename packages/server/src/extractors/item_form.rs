use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use common::storage::ImageUpload;
use serde_json::{Map, Value};

use super::json::AppJson;
use crate::error::AppError;

/// Name of the multipart file field carrying an item image.
pub const IMAGE_FIELD: &str = "image";

/// Raw create/update payload, from either a JSON object or a
/// `multipart/form-data` form.
///
/// Multipart text fields are collected as JSON strings; decoding into typed
/// values happens in [`crate::services::ItemInput`].
pub struct ItemForm {
    pub fields: Map<String, Value>,
    pub image: Option<ImageUpload>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for ItemForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let AppJson(body) = AppJson::<Value>::from_request(req, state).await?;
            return match body {
                Value::Object(fields) => Ok(Self {
                    fields,
                    image: None,
                }),
                _ => Err(AppError::Validation(
                    "Request body must be a JSON object".into(),
                )),
            };
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut fields = Map::new();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    AppError::AttachmentRejected(format!("Failed to read image: {e}"))
                })?;
                // Browsers send an empty part when the file input was left blank.
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                image = Some(ImageUpload {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read field '{name}': {e}"))
                })?;
                fields.insert(name, Value::String(text));
            }
        }

        Ok(Self { fields, image })
    }
}
