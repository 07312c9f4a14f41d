use crate::api::extract::ValidatedJson;
use crate::api::ErrorResponse;
use crate::auth::{verify_password_or_dummy, TokenKeys};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::users;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Bearer token, valid for one hour.
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body(content = LoginRequest, example = json!({"email": "ana@example.com", "password": "password123"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(keys): State<Arc<TokenKeys>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut conn = pool.get()?;

    // Unknown email and wrong password must be indistinguishable, in timing too.
    let user = users::find_by_email(&mut conn, &req.email)?;
    let verified = verify_password_or_dummy(
        &req.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    );
    let user = user
        .filter(|_| verified)
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let token = keys
        .issue(user.id, &user.role)
        .map_err(|e| ApiError::internal(format!("failed to sign token: {e}")))?;

    Ok(Json(LoginResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{db_server, seed_user};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let Some((server, pool)) = db_server() else {
            return;
        };
        seed_user(&pool, "known@example.com", "password123");

        let wrong_password = server
            .post("/api/v1/users/login")
            .json(&json!({"email": "known@example.com", "password": "password999"}))
            .await;
        let unknown_email = server
            .post("/api/v1/users/login")
            .json(&json!({"email": "nobody@example.com", "password": "password123"}))
            .await;

        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        unknown_email.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.text(), unknown_email.text());
        unknown_email.assert_json(&json!({ "error": "Invalid credentials" }));
    }

    #[tokio::test]
    async fn test_login_returns_token_for_normalized_email() {
        let Some((server, pool)) = db_server() else {
            return;
        };
        let id = seed_user(&pool, "chef@example.com", "password123");

        let response = server
            .post("/api/v1/users/login")
            .json(&json!({"email": "Chef@Example.com", "password": "password123"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], id.to_string());
        assert_eq!(body["email"], "chef@example.com");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }
}
