pub mod generate;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /ai endpoints (mounted at /api/v1/ai)
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-magic", post(generate::generate_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(generate::generate_recipe),
    components(schemas(
        generate::GenerateRecipeRequest,
        generate::GenerateRecipeResponse,
        sazon_core::RecipeDraft,
        sazon_core::DraftIngredient,
    ))
)]
pub struct ApiDoc;
