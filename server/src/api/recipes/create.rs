use crate::api::extract::ValidatedJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::recipes::{self, RecipeDetail, RecipeInput};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sazon_core::{MealType, Visibility};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::payload::{IngredientPayload, MediaPayload};

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 3, message = "Recipe name must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: String,
    #[validate(range(min = 1, message = "Preparation time must be at least 1 minute"))]
    pub preparation_time_minutes: i32,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    /// Defaults to private.
    #[serde(default)]
    pub visibility: Visibility,
    /// Ordered preparation steps.
    #[validate(length(min = 1, message = "Instructions are required"))]
    pub instructions: Vec<String>,
    #[validate(
        length(min = 1, message = "Recipe must have at least one ingredient"),
        nested
    )]
    pub ingredients: Vec<IngredientPayload>,
    #[serde(default)]
    #[validate(nested)]
    pub media: Vec<MediaPayload>,
}

impl CreateRecipeRequest {
    fn to_input(&self) -> RecipeInput {
        RecipeInput {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            preparation_time_minutes: self.preparation_time_minutes,
            meal_type: self.meal_type,
            visibility: self.visibility,
            instructions: self.instructions.clone(),
            ingredients: self.ingredients.iter().map(IngredientPayload::to_line).collect(),
            media: self.media.iter().map(MediaPayload::to_item).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub message: String,
    pub recipe: RecipeDetail,
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes/create",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(request): ValidatedJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let recipe = recipes::create(&mut conn, claims.id, &request.to_input())?;

    tracing::info!(recipe_id = %recipe.id, user_id = %claims.id, "created recipe");

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            message: "Recipe created successfully".to_string(),
            recipe,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{offline_server, token};
    use serde_json::json;

    fn valid_body() -> serde_json::Value {
        json!({
            "name": "Lentil Soup",
            "description": "Warm and filling lentil soup",
            "image_url": "https://img.example.com/soup.jpg",
            "preparation_time_minutes": 40,
            "type": "dinner",
            "instructions": ["Rinse lentils", "Simmer"],
            "ingredients": [
                {"name": "Lentils", "quantity": "250", "unit_of_measure": "g"},
                {"name": "Salt", "quantity": "", "unit_of_measure": "to taste"}
            ]
        })
    }

    #[test]
    fn test_defaults_and_conversion() {
        let request: CreateRecipeRequest = serde_json::from_value(valid_body()).unwrap();
        assert!(request.validate().is_ok());

        let input = request.to_input();
        assert_eq!(input.visibility, Visibility::Private);
        assert_eq!(input.meal_type, MealType::Dinner);
        assert_eq!(input.ingredients[0].quantity, Some(250.0));
        assert_eq!(input.ingredients[1].quantity, None);
        assert!(input.media.is_empty());
    }

    #[tokio::test]
    async fn test_requires_token() {
        let server = offline_server();

        let response = server.post("/api/v1/recipes/create").json(&valid_body()).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_payload_lists_every_problem() {
        let server = offline_server();
        let mut body = valid_body();
        body["name"] = json!("ab");
        body["ingredients"] = json!([]);
        body["image_url"] = json!("not a url");

        let response = server
            .post("/api/v1/recipes/create")
            .authorization_bearer(token())
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "error": "Image URL must be a valid URL, Recipe must have at least one ingredient, Recipe name must be at least 3 characters"
        }));
    }

    #[tokio::test]
    async fn test_unknown_meal_type_is_400() {
        let server = offline_server();
        let mut body = valid_body();
        body["type"] = json!("brunch");

        let response = server
            .post("/api/v1/recipes/create")
            .authorization_bearer(token())
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
