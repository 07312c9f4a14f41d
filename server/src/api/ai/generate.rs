use crate::api::extract::ValidatedJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::generation;
use axum::{extract::State, Json};
use sazon_core::{LlmProvider, RecipeDraft};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct GenerateRecipeRequest {
    /// What to cook, in any language.
    #[validate(length(min = 3, message = "Prompt must be at least 3 characters"))]
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateRecipeResponse {
    pub message: String,
    /// Not saved. Send it to the create endpoint to keep it.
    pub recipe: RecipeDraft,
}

#[utoipa::path(
    post,
    path = "/api/v1/ai/generate-magic",
    tag = "ai",
    request_body(content = GenerateRecipeRequest, example = json!({"prompt": "something quick with lentils"})),
    responses(
        (status = 200, description = "Generated recipe draft", body = GenerateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 429, description = "Daily generation limit reached", body = ErrorResponse),
        (status = 500, description = "The model failed to produce a recipe", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate_recipe(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(llm): State<Arc<dyn LlmProvider>>,
    ValidatedJson(req): ValidatedJson<GenerateRecipeRequest>,
) -> Result<Json<GenerateRecipeResponse>, ApiError> {
    let recipe = generation::generate(&pool, llm.as_ref(), claims.id, req.prompt.trim()).await?;

    Ok(Json(GenerateRecipeResponse {
        message: "Recipe generated successfully".to_string(),
        recipe,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{offline_server, token};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_short_prompt_rejected_before_quota() {
        let server = offline_server();

        let response = server
            .post("/api/v1/ai/generate-magic")
            .authorization_bearer(token())
            .json(&json!({"prompt": "hi"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Prompt must be at least 3 characters" }));
    }
}
