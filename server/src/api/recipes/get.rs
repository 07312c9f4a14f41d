use crate::api::extract::ApiPath;
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::recipes::{self, RecipeDetail};
use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetail),
        (status = 404, description = "Recipe not found or not visible", body = ErrorResponse)
    ),
    security(
        (),
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let mut conn = pool.get()?;
    let recipe = recipes::find_by_id(&mut conn, id, viewer.map(|claims| claims.id))?;
    Ok(Json(recipe))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::offline_server;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_malformed_id_is_400() {
        let server = offline_server();

        let response = server.get("/api/v1/recipes/not-a-uuid").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
