use crate::api::extract::{not_blank, ValidatedJson};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::pantry::{self, PantryEntry};
use axum::{extract::State, Json};
use sazon_core::PantryStock;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct AddPantryItemRequest {
    #[validate(custom(function = "not_blank", message = "Ingredient name is required"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be greater than 0"))]
    pub quantity: f64,
    #[validate(custom(function = "not_blank", message = "Unit of measure is required"))]
    pub unit_of_measure: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/pantry/items",
    tag = "pantry",
    request_body(content = AddPantryItemRequest, example = json!({"name": "Flour", "quantity": 2, "unit_of_measure": "kg"})),
    responses(
        (status = 200, description = "Pantry item after the addition", body = PantryEntry),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_pantry_item(
    AuthUser(claims): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(req): ValidatedJson<AddPantryItemRequest>,
) -> Result<Json<PantryEntry>, ApiError> {
    let incoming = PantryStock::new(req.quantity, req.unit_of_measure.trim());

    let mut conn = pool.get()?;
    let entry = pantry::add(&mut conn, claims.id, &req.name, &incoming)?;

    Ok(Json(entry))
}
