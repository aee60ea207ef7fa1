use axum::Json;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{Envelope, Item};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::item_form::ItemForm;
use crate::extractors::json::AppJson;
use crate::models::item::*;
use crate::services::{ItemInput, decode_quantity};
use crate::state::AppState;

/// Multipart overhead allowed on top of the image size limit.
const FORM_OVERHEAD: usize = 64 * 1024;

/// Body limit layer for item create/update, sized from the attachment limit.
pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(limit.saturating_add(FORM_OVERHEAD))
}

#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    operation_id = "listItems",
    summary = "List all items",
    description = "Returns every item, oldest first, with the number of items in `count`.",
    responses(
        (status = 200, description = "All items", body = Envelope<Vec<Item>>),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Item>>>, AppError> {
    let items = state.items.list().await?;
    Ok(Json(Envelope::list(items)))
}

#[utoipa::path(
    get,
    path = "/items/low-stock",
    tag = "Items",
    operation_id = "listLowStockItems",
    summary = "List items at or below their low-stock threshold",
    responses(
        (status = 200, description = "Low-stock items", body = Envelope<Vec<Item>>),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_low_stock_items(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Item>>>, AppError> {
    let items = state.items.list_low_stock().await?;
    Ok(Json(Envelope::list(items)))
}

#[utoipa::path(
    get,
    path = "/items/sku",
    tag = "Items",
    operation_id = "suggestSku",
    summary = "Generate a SKU suggestion",
    description = "Returns `PREFIX-<base36 timestamp>`. The suggestion is not reserved.",
    params(SkuQuery),
    responses(
        (status = 200, description = "Suggested SKU", body = Envelope<SkuSuggestion>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn suggest_sku(
    State(state): State<AppState>,
    Query(query): Query<SkuQuery>,
) -> Json<Envelope<SkuSuggestion>> {
    let sku = state.items.generate_sku(query.prefix.as_deref());
    Json(Envelope::ok(SkuSuggestion { sku }))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "Items",
    operation_id = "getItem",
    summary = "Get an item by ID",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item", body = Envelope<Item>),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Item>>, AppError> {
    let item = state.items.get(&id).await?;
    Ok(Json(Envelope::ok(item)))
}

#[utoipa::path(
    post,
    path = "/items",
    tag = "Items",
    operation_id = "createItem",
    summary = "Create an item",
    description = "Accepts a JSON object, or `multipart/form-data` with the same fields as text and an optional `image` file (JPEG, PNG or WebP). `SKU` and `name` are required. Unset fields get defaults: unit `pcs`, quantity 0, cost 0, lowStockThreshold 0.",
    request_body = ItemRequest,
    responses(
        (status = 201, description = "Item created", body = Envelope<Item>),
        (status = 400, description = "Invalid input (VALIDATION_ERROR, ATTACHMENT_REJECTED)", body = ErrorBody),
        (status = 409, description = "SKU already in use (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form), fields(has_image = form.image.is_some()))]
pub async fn create_item(
    State(state): State<AppState>,
    form: ItemForm,
) -> Result<impl IntoResponse, AppError> {
    let input = ItemInput::from_fields(&form.fields)?;
    let item = state.items.create(input, form.image).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(item).with_message("Item created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "Items",
    operation_id = "updateItem",
    summary = "Update an item",
    description = "Partial update: absent, null or empty fields keep their stored value. Accepts JSON or multipart like create; an uploaded `image` replaces the current one.",
    params(("id" = String, Path, description = "Item ID")),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item updated", body = Envelope<Item>),
        (status = 400, description = "Invalid input (VALIDATION_ERROR, ATTACHMENT_REJECTED)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "SKU already in use (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form), fields(has_image = form.image.is_some()))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: ItemForm,
) -> Result<Json<Envelope<Item>>, AppError> {
    let input = ItemInput::from_fields(&form.fields)?;
    let item = state.items.update(&id, input, form.image).await?;
    Ok(Json(
        Envelope::ok(item).with_message("Item updated successfully"),
    ))
}

#[utoipa::path(
    patch,
    path = "/items/{id}/quantity",
    tag = "Items",
    operation_id = "updateItemQuantity",
    summary = "Set an item's quantity",
    params(("id" = String, Path, description = "Item ID")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = Envelope<Item>),
        (status = 400, description = "Invalid quantity (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, body))]
pub async fn update_item_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<Value>,
) -> Result<Json<Envelope<Item>>, AppError> {
    let quantity = decode_quantity(body.get("quantity"))?;
    let item = state.items.update_quantity(&id, quantity).await?;
    Ok(Json(Envelope::ok(item).with_message("Quantity updated")))
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "Items",
    operation_id = "deleteItem",
    summary = "Delete an item",
    description = "Removes the item and returns the deleted record. Its image is removed in the background.",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = Envelope<Item>),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Item>>, AppError> {
    let item = state.items.delete(&id).await?;
    Ok(Json(
        Envelope::ok(item).with_message("Item deleted successfully"),
    ))
}
