//! Domain rules for the Sazon recipe backend that do not touch the database.

pub mod generation;
pub mod llm;
pub mod pagination;
pub mod pantry;
pub mod quota;
pub mod types;

pub use llm::{create_provider_from_env, CompletionRequest, LlmError, LlmProvider};
pub use pagination::{split_page, Cursor, Keyed, Page};
pub use pantry::{merge_stock, PantryStock};
pub use quota::{evaluate as evaluate_quota, QuotaDecision, QuotaState};
pub use types::{DraftIngredient, MealType, MediaType, RecipeDraft, Visibility};
