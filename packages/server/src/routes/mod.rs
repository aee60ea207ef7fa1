use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::item;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    item_routes(config)
}

fn item_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    // Routes without uploads keep the default body limit.
    let small_bodies = OpenApiRouter::new()
        .routes(routes!(item::list_low_stock_items))
        .routes(routes!(item::suggest_sku))
        .routes(routes!(item::update_item_quantity));

    // Create and update may carry an image, so they get the larger body limit.
    let forms = OpenApiRouter::new()
        .routes(routes!(item::list_items, item::create_item))
        .routes(routes!(item::get_item, item::update_item, item::delete_item))
        .layer(item::upload_body_limit(config.storage.max_upload_size));

    small_bodies.merge(forms)
}
