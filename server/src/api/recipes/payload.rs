//! Request bodies shared by recipe create and update.

use crate::api::extract::not_blank;
use crate::store::recipes::{IngredientLine, MediaItem};
use sazon_core::MediaType;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct IngredientPayload {
    #[validate(custom(function = "not_blank", message = "Ingredient name is required"))]
    pub name: String,
    /// A number (as JSON number or string), or blank when the amount is
    /// qualitative ("to taste").
    #[serde(default, deserialize_with = "quantity_text")]
    #[validate(custom(function = "validate_quantity"))]
    pub quantity: String,
    #[serde(default)]
    pub unit_of_measure: String,
}

impl IngredientPayload {
    pub fn to_line(&self) -> IngredientLine {
        IngredientLine {
            name: self.name.trim().to_string(),
            quantity: parse_quantity(&self.quantity).ok().flatten(),
            unit_of_measure: self.unit_of_measure.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct MediaPayload {
    #[validate(url(message = "Media URL must be a valid URL"))]
    pub url: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub display_order: i32,
}

impl MediaPayload {
    pub fn to_item(&self) -> MediaItem {
        MediaItem {
            url: self.url.clone(),
            media_type: self.media_type,
            display_order: self.display_order,
        }
    }
}

/// Blank means "no numeric amount". Anything else must be a finite number.
pub fn parse_quantity(text: &str) -> Result<Option<f64>, ()> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(()),
    }
}

fn validate_quantity(quantity: &str) -> Result<(), ValidationError> {
    parse_quantity(quantity).map(|_| ()).map_err(|_| {
        ValidationError::new("quantity")
            .with_message(Cow::Borrowed("Ingredient quantity must be a number or blank"))
    })
}

fn quantity_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "quantity must be a number or a string, got {other}"
        ))),
    }
}
