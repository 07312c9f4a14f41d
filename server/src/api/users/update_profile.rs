use crate::api::extract::ValidatedJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::ProfileChanges;
use crate::store::users::{self, UserProfile};
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Omitted fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 5, message = "Name must be at least 5 characters"))]
    pub name: Option<String>,
    #[validate(url(message = "Profile picture URL must be a valid URL"))]
    pub profile_picture_url: Option<String>,
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-profile",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let changes = ProfileChanges {
        name: req.name.as_deref().map(str::trim),
        profile_picture_url: req.profile_picture_url.as_deref(),
    };

    let mut conn = pool.get()?;
    Ok(Json(users::update_profile(&mut conn, claims.id, &changes)?))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{offline_server, token};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_invalid_picture_url_rejected() {
        let server = offline_server();

        let response = server
            .patch("/api/v1/users/update-profile")
            .authorization_bearer(token())
            .json(&json!({"profile_picture_url": "not a url"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Profile picture URL must be a valid URL" }));
    }
}
