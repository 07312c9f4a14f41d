//! Prompt and response contract for AI recipe generation.

use crate::llm::{CompletionRequest, LlmError};
use crate::types::RecipeDraft;
use serde_json::json;

pub const GENERATION_TEMPERATURE: f32 = 0.6;

pub const SYSTEM_PROMPT: &str = r#"You are a professional multilingual culinary assistant.
Detect the user's language automatically and generate the recipe using that language for all text content.
Always keep JSON structure and field names in English, as defined in the schema.

Formatting rules for ingredients:
- "quantity" must contain only numeric values (e.g., "1", "200", "0.5").
- If the quantity is qualitative or not numeric (like "to taste", "a pinch", "a few"),
  leave "quantity" empty ("") and write that description in "unit_of_measure".
- "unit_of_measure" should contain units or descriptive terms such as "grams", "cups", "to taste", "al gusto", etc.

Examples:
Correct:
{"name": "Salt", "quantity": "", "unit_of_measure": "to taste"}

Incorrect:
{"name": "Salt", "quantity": "to taste", "unit_of_measure": ""}

Return only valid JSON following the schema. No extra commentary or markdown."#;

pub fn render_prompt(user_prompt: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nUser request: {user_prompt}")
}

/// Response schema in the Gemini `Schema` dialect.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "The recipe title."
            },
            "description": {
                "type": "STRING",
                "description": "A short description of the recipe."
            },
            "preparationTime": {
                "type": "NUMBER",
                "description": "Total preparation time in minutes."
            },
            "ingredients": {
                "type": "ARRAY",
                "description": "List of ingredients.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "quantity": {
                            "type": "STRING",
                            "description": "Numeric value (e.g. '2', '150', '0.5'). Leave blank if not numeric."
                        },
                        "unit_of_measure": {
                            "type": "STRING",
                            "description": "Textual descriptor (e.g. 'grams', 'cups', 'to taste')."
                        }
                    },
                    "required": ["name", "quantity", "unit_of_measure"]
                }
            },
            "instructions": {
                "type": "ARRAY",
                "description": "Step by step instructions.",
                "items": { "type": "STRING" }
            },
            "type": {
                "type": "STRING",
                "enum": ["breakfast", "lunch", "dinner"],
                "description": "Meal type for the recipe."
            }
        },
        "required": ["name", "description", "preparationTime", "ingredients", "instructions", "type"]
    })
}

pub fn build_request(user_prompt: &str) -> CompletionRequest {
    CompletionRequest {
        prompt: render_prompt(user_prompt),
        response_schema: Some(response_schema()),
        temperature: Some(GENERATION_TEMPERATURE),
    }
}

/// Parse the model's JSON payload into a draft.
pub fn parse_draft(text: &str) -> Result<RecipeDraft, LlmError> {
    serde_json::from_str(text.trim()).map_err(|e| LlmError::ParseError(e.to_string()))
}
