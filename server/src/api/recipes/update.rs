use crate::api::extract::{ApiPath, ValidatedJson};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::recipes::{self, RecipeDetail, RecipePatch};
use axum::{extract::State, Json};
use sazon_core::{MealType, Visibility};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::payload::{IngredientPayload, MediaPayload};

/// Every field is optional. `ingredients` and `media`, when sent, replace the
/// recipe's whole list.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateRecipeRequest {
    #[validate(length(min = 3, message = "Recipe name must be at least 3 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(range(min = 1, message = "Preparation time must be at least 1 minute"))]
    pub preparation_time_minutes: Option<i32>,
    #[serde(rename = "type")]
    pub meal_type: Option<MealType>,
    pub visibility: Option<Visibility>,
    #[validate(length(min = 1, message = "Instructions are required"))]
    pub instructions: Option<Vec<String>>,
    #[validate(
        length(min = 1, message = "Recipe must have at least one ingredient"),
        nested
    )]
    pub ingredients: Option<Vec<IngredientPayload>>,
    #[validate(nested)]
    pub media: Option<Vec<MediaPayload>>,
}

impl UpdateRecipeRequest {
    fn to_patch(&self) -> RecipePatch {
        RecipePatch {
            name: self.name.as_deref().map(|n| n.trim().to_string()),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            preparation_time_minutes: self.preparation_time_minutes,
            meal_type: self.meal_type,
            visibility: self.visibility,
            instructions: self.instructions.clone(),
            ingredients: self
                .ingredients
                .as_ref()
                .map(|lines| lines.iter().map(IngredientPayload::to_line).collect()),
            media: self
                .media
                .as_ref()
                .map(|items| items.iter().map(MediaPayload::to_item).collect()),
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetail),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not owned by caller", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateRecipeRequest>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let mut conn = pool.get()?;
    let recipe = recipes::update_by_id(&mut conn, claims.id, id, &request.to_patch())?;

    tracing::info!(recipe_id = %id, user_id = %claims.id, "updated recipe");

    Ok(Json(recipe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_stay_none() {
        let request: UpdateRecipeRequest =
            serde_json::from_value(json!({"visibility": "public"})).unwrap();
        assert!(request.validate().is_ok());

        let patch = request.to_patch();
        assert_eq!(patch.visibility, Some(Visibility::Public));
        assert!(patch.name.is_none());
        assert!(patch.ingredients.is_none());
        assert!(patch.media.is_none());
    }

    #[test]
    fn test_empty_media_list_clears_media() {
        let request: UpdateRecipeRequest = serde_json::from_value(json!({"media": []})).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.to_patch().media, Some(vec![]));
    }

    #[test]
    fn test_present_fields_are_validated() {
        let request: UpdateRecipeRequest =
            serde_json::from_value(json!({"description": "short", "ingredients": []})).unwrap();
        assert!(request.validate().is_err());
    }
}
