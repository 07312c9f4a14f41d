//! Keyset pagination over `(created_at DESC, id DESC)`.
//!
//! `created_at` alone is not unique, so the id breaks ties and the pair gives
//! a stable total order. A page query asks for `limit + 1` rows; the extra row
//! only signals that another page exists and is never returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Position after which the next page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Rows that can be positioned in the listing order.
pub trait Keyed {
    fn cursor(&self) -> Cursor;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<Cursor>,
}

/// Turn the `limit + 1` rows fetched for a page into the page itself.
///
/// The cursor is taken from the last row returned, so a strict `<` comparison
/// on the next request starts exactly at the row that was held back.
pub fn split_page<T: Keyed>(mut rows: Vec<T>, limit: usize) -> Page<T> {
    if rows.len() > limit {
        rows.truncate(limit);
        let next_cursor = rows.last().map(Keyed::cursor);
        Page {
            data: rows,
            next_cursor,
        }
    } else {
        Page {
            data: rows,
            next_cursor: None,
        }
    }
}
