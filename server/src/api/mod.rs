pub mod ai;
pub mod extract;
pub mod pantry;
pub mod recipes;
pub mod users;

use crate::error::ApiError;
use crate::AppState;
use axum::Router;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body for endpoints that only confirm an action.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub const API_PREFIX: &str = "/api/v1";

/// Every endpoint, nested under [`API_PREFIX`], with a JSON 404 for anything
/// unmatched.
pub fn router() -> Router<AppState> {
    let v1 = Router::new()
        .nest("/users", users::router())
        .nest("/recipes", recipes::router())
        .nest("/pantry", pantry::router())
        .nest("/ai", ai::router());

    Router::new()
        .nest(API_PREFIX, v1)
        .fallback(|| async { ApiError::not_found("Route not found") })
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Sazon API", description = "Recipes, pantry and AI recipe drafts"),
        components(schemas(ErrorResponse, MessageResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        users::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        pantry::ApiDoc::openapi(),
        ai::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::{hash_password, TokenKeys};
    use crate::db::{lazy_pool, test_pool, DbPool};
    use crate::store::users;
    use crate::AppState;
    use axum_test::TestServer;
    use sazon_core::llm::FakeProvider;
    use std::sync::Arc;
    use uuid::Uuid;

    pub const TEST_SECRET: &str = "router-test-secret";

    /// A server whose pool points at nothing. Only requests rejected before
    /// the first query can be exercised.
    pub fn offline_server() -> TestServer {
        let state = AppState {
            pool: Arc::new(lazy_pool("postgres://nobody@127.0.0.1:1/none")),
            keys: Arc::new(TokenKeys::from_secret(TEST_SECRET)),
            llm: Arc::new(FakeProvider::default()),
        };
        TestServer::new(super::router().with_state(state)).unwrap()
    }

    /// A server over the test database, plus its pool for seeding. `None`
    /// without `TEST_DATABASE_URL`.
    pub fn db_server() -> Option<(TestServer, DbPool)> {
        let pool = test_pool()?;
        let state = AppState {
            pool: Arc::new(pool.clone()),
            keys: Arc::new(TokenKeys::from_secret(TEST_SECRET)),
            llm: Arc::new(FakeProvider::default()),
        };
        let server = TestServer::new(super::router().with_state(state)).unwrap();
        Some((server, pool))
    }

    /// Insert a user that can log in with `password`.
    pub fn seed_user(pool: &DbPool, email: &str, password: &str) -> Uuid {
        let hash = hash_password(password).unwrap();
        users::create(&mut pool.get().unwrap(), "Test Cook", email, &hash).unwrap()
    }

    /// A valid token for a user that does not exist in any database.
    pub fn token() -> String {
        token_for(Uuid::new_v4())
    }

    pub fn token_for(user_id: Uuid) -> String {
        TokenKeys::from_secret(TEST_SECRET)
            .issue(user_id, "user")
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::offline_server;
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let server = offline_server();

        let response = server.get("/api/v1/nothing-here").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&serde_json::json!({ "error": "Route not found" }));
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = openapi();
        for path in [
            "/api/v1/users/register",
            "/api/v1/users/login",
            "/api/v1/users/me",
            "/api/v1/users/update-profile",
            "/api/v1/users/update-password",
            "/api/v1/recipes/create",
            "/api/v1/recipes",
            "/api/v1/recipes/{id}",
            "/api/v1/pantry/items",
            "/api/v1/pantry",
            "/api/v1/ai/generate-magic",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
