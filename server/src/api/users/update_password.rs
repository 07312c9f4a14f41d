use crate::api::extract::ValidatedJson;
use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::users;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Current password must be at least 8 characters"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-password",
    tag = "users",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Email or current password is wrong", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_password(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(req): ValidatedJson<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = pool.get()?;

    let user = users::find_by_id(&mut conn, claims.id)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if user.email != users::normalize_email(&req.email) {
        return Err(ApiError::unauthorized("Email does not match this account"));
    }
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| ApiError::internal(format!("failed to hash password: {e}")))?;
    users::update_password_hash(&mut conn, user.id, &password_hash)?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{db_server, seed_user, token_for};
    use crate::auth::verify_password;
    use crate::store::users;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_mismatched_email_is_unauthorized() {
        let Some((server, pool)) = db_server() else {
            return;
        };
        let id = seed_user(&pool, "owner@example.com", "password123");

        let response = server
            .patch("/api/v1/users/update-password")
            .authorization_bearer(token_for(id))
            .json(&json!({
                "email": "someone.else@example.com",
                "currentPassword": "password123",
                "newPassword": "password456"
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Email does not match this account" }));
    }

    #[tokio::test]
    async fn test_wrong_current_password_is_unauthorized() {
        let Some((server, pool)) = db_server() else {
            return;
        };
        let id = seed_user(&pool, "owner@example.com", "password123");

        let response = server
            .patch("/api/v1/users/update-password")
            .authorization_bearer(token_for(id))
            .json(&json!({
                "email": "owner@example.com",
                "currentPassword": "password000",
                "newPassword": "password456"
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Current password is incorrect" }));
    }

    #[tokio::test]
    async fn test_password_is_replaced() {
        let Some((server, pool)) = db_server() else {
            return;
        };
        let id = seed_user(&pool, "owner@example.com", "password123");

        let response = server
            .patch("/api/v1/users/update-password")
            .authorization_bearer(token_for(id))
            .json(&json!({
                "email": "Owner@example.com",
                "currentPassword": "password123",
                "newPassword": "password456"
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Password updated successfully" }));

        let user = users::find_by_id(&mut pool.get().unwrap(), id)
            .unwrap()
            .unwrap();
        assert!(verify_password("password456", &user.password_hash));
    }
}
