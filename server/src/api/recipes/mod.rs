pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod payload;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /recipes endpoints (mounted at /api/v1/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes))
        .route("/create", post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        list::ListRecipesResponse,
        update::UpdateRecipeRequest,
        payload::IngredientPayload,
        payload::MediaPayload,
        crate::store::recipes::RecipeDetail,
        crate::store::recipes::RecipeSummary,
        crate::store::recipes::RecipeOwner,
        crate::store::recipes::RecipeIngredientView,
        crate::store::recipes::RecipeMediaView,
        sazon_core::Cursor,
        sazon_core::MealType,
        sazon_core::Visibility,
        sazon_core::MediaType,
    ))
)]
pub struct ApiDoc;
