pub mod add;
pub mod list;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /pantry endpoints (mounted at /api/v1/pantry)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_pantry))
        .route("/items", post(add::add_pantry_item))
}

#[derive(OpenApi)]
#[openapi(
    paths(add::add_pantry_item, list::list_pantry),
    components(schemas(
        add::AddPantryItemRequest,
        list::PantryResponse,
        crate::store::pantry::PantryEntry,
    ))
)]
pub struct ApiDoc;
