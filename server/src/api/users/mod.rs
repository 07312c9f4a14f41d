pub mod login;
pub mod me;
pub mod register;
pub mod update_password;
pub mod update_profile;

use crate::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /users endpoints (mounted at /api/v1/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .route("/me", get(me::get_me))
        .route("/update-profile", patch(update_profile::update_profile))
        .route("/update-password", patch(update_password::update_password))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        register::register,
        login::login,
        me::get_me,
        update_profile::update_profile,
        update_password::update_password,
    ),
    components(schemas(
        register::RegisterRequest,
        register::RegisterResponse,
        login::LoginRequest,
        login::LoginResponse,
        crate::store::users::UserProfile,
        update_profile::UpdateProfileRequest,
        update_password::UpdatePasswordRequest,
    ))
)]
pub struct ApiDoc;
