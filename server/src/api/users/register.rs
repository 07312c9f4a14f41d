use crate::api::extract::ValidatedJson;
use crate::api::ErrorResponse;
use crate::auth::hash_password;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::users;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 5, message = "Name must be at least 5 characters"))]
    pub name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body(content = RegisterRequest, example = json!({"name": "Ana Cocina", "email": "ana@example.com", "password": "password123"})),
    responses(
        (status = 201, description = "User created successfully", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("failed to hash password: {e}")))?;

    let mut conn = pool.get()?;
    let id = users::create(&mut conn, &req.name, &req.email, &password_hash)?;

    tracing::info!(user_id = %id, "registered user");

    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::offline_server;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_validation_messages_are_joined() {
        let server = offline_server();

        let response = server
            .post("/api/v1/users/register")
            .json(&json!({"name": "Ana", "email": "not-an-email", "password": "short"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "error": "Email must be a valid email address, Name must be at least 5 characters, Password must be at least 8 characters"
        }));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let server = offline_server();

        let response = server
            .post("/api/v1/users/register")
            .content_type("application/json")
            .bytes(r#"{"name": "Ana Cocina", "email": "#.into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Request body contains malformed JSON" }));
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let server = offline_server();

        let response = server
            .post("/api/v1/users/register")
            .json(&json!({"name": "Ana Cocina", "email": "ana@example.com"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
