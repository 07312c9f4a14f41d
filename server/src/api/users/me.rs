use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::users::{self, UserProfile};
use axum::{extract::State, Json};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Profile of the calling user", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut conn = pool.get()?;
    Ok(Json(users::get_profile(&mut conn, claims.id)?))
}
