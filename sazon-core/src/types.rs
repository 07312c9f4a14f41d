use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Meal a recipe is meant for.
    MealType, "meal type" {
        Breakfast => "breakfast",
        Lunch => "lunch",
        Dinner => "dinner",
    }
}

string_enum! {
    /// Who may read a recipe. Private recipes are only visible to their owner.
    Visibility, "visibility" {
        Public => "public",
        Private => "private",
    }
}

string_enum! {
    MediaType, "media type" {
        Image => "image",
        Video => "video",
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Private
    }
}

/// One ingredient line of a generated recipe.
///
/// `quantity` is a numeric string, or empty when the amount is qualitative,
/// in which case `unit_of_measure` holds the description ("to taste").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DraftIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_of_measure: String,
}

/// A recipe proposed by the generative model. Never persisted automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    /// Total preparation time in minutes.
    #[serde(rename = "preparationTime", deserialize_with = "deserialize_minutes")]
    pub preparation_time: u32,
    pub ingredients: Vec<DraftIngredient>,
    pub instructions: Vec<String>,
    #[serde(rename = "type")]
    pub meal_type: MealType,
}

/// The model is asked for a JSON number, which may come back as `25.0`.
fn deserialize_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "invalid preparation time: {value}"
        )));
    }
    Ok(value.round() as u32)
}
