use crate::api::extract::ApiQuery;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::recipes::{self, RecipeSummary};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use sazon_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use sazon_core::Cursor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListRecipesParams {
    /// Number of items to return (default: 10, max: 50)
    pub limit: Option<i64>,
    /// `id` of the `nextCursor` from the previous page
    pub cursor_id: Option<Uuid>,
    /// `created_at` of the `nextCursor` from the previous page
    pub cursor_date: Option<DateTime<Utc>>,
}

impl ListRecipesParams {
    fn page_size(&self) -> Result<i64, ApiError> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ApiError::bad_request(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(limit)
    }

    fn cursor(&self) -> Result<Option<Cursor>, ApiError> {
        match (self.cursor_id, self.cursor_date) {
            (Some(id), Some(created_at)) => Ok(Some(Cursor { created_at, id })),
            (None, None) => Ok(None),
            _ => Err(ApiError::bad_request(
                "cursorId and cursorDate must be provided together",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub data: Vec<RecipeSummary>,
    /// Pass back as `cursorId`/`cursorDate` for the next page. `null` on the
    /// last page.
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<Cursor>,
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Page of public recipes, newest first", body = ListRecipesResponse),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(pool): State<Arc<DbPool>>,
    ApiQuery(params): ApiQuery<ListRecipesParams>,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let limit = params.page_size()?;
    let cursor = params.cursor()?;

    let mut conn = pool.get()?;
    let page = recipes::find_public(&mut conn, limit, cursor)?;

    Ok(Json(ListRecipesResponse {
        data: page.data,
        next_cursor: page.next_cursor,
    }))
}
