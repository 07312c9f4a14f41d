use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::pantry::{self, PantryEntry};
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PantryResponse {
    pub items: Vec<PantryEntry>,
}

#[utoipa::path(
    get,
    path = "/api/v1/pantry",
    tag = "pantry",
    responses(
        (status = 200, description = "The caller's pantry, by ingredient name", body = PantryResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_pantry(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<PantryResponse>, ApiError> {
    let mut conn = pool.get()?;
    let items = pantry::list(&mut conn, claims.id)?;
    Ok(Json(PantryResponse { items }))
}
