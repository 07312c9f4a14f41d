use crate::error::ApiError;
use crate::models::{NewUser, ProfileChanges, User};
use crate::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use sazon_core::QuotaState;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

const USER_NOT_FOUND: &str = "User not found";

/// Everything about a user that may be shown back to them.
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub profile_picture_url: Option<String>,
    pub generation_count: i32,
    pub last_generation_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Emails are unique case-insensitively; this is the stored form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn create(
    conn: &mut PgConnection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<Uuid, ApiError> {
    let email = normalize_email(email);
    let new_user = NewUser {
        name: name.trim(),
        email: &email,
        password_hash,
    };

    let id = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(users::id)
        .get_result(conn)?;
    Ok(id)
}

pub fn find_by_email(conn: &mut PgConnection, email: &str) -> Result<Option<User>, ApiError> {
    let user = users::table
        .filter(users::email.eq(normalize_email(email)))
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(user)
}

pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<User>, ApiError> {
    let user = users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(user)
}

pub fn get_profile(conn: &mut PgConnection, id: Uuid) -> Result<UserProfile, ApiError> {
    users::table
        .find(id)
        .select(UserProfile::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
}

/// Apply a partial profile update. With nothing to change the current
/// profile is returned as is.
pub fn update_profile(
    conn: &mut PgConnection,
    id: Uuid,
    changes: &ProfileChanges<'_>,
) -> Result<UserProfile, ApiError> {
    if changes.name.is_none() && changes.profile_picture_url.is_none() {
        return get_profile(conn, id);
    }

    diesel::update(users::table.find(id))
        .set(changes)
        .returning(UserProfile::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
}

pub fn update_password_hash(
    conn: &mut PgConnection,
    id: Uuid,
    password_hash: &str,
) -> Result<(), ApiError> {
    let updated = diesel::update(users::table.find(id))
        .set(users::password_hash.eq(password_hash))
        .execute(conn)?;
    if updated == 0 {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    Ok(())
}

pub fn get_quota(conn: &mut PgConnection, id: Uuid) -> Result<QuotaState, ApiError> {
    let (generation_count, last_generation_at) = users::table
        .find(id)
        .select((users::generation_count, users::last_generation_at))
        .first::<(i32, DateTime<Utc>)>(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(QuotaState {
        generation_count,
        last_generation_at,
    })
}

/// Overwrite both quota fields, but only if they still hold `observed`.
/// Returns false when another request changed them first.
pub fn update_generation_quota(
    conn: &mut PgConnection,
    id: Uuid,
    observed: &QuotaState,
    next: &QuotaState,
) -> Result<bool, ApiError> {
    let updated = diesel::update(
        users::table
            .find(id)
            .filter(users::generation_count.eq(observed.generation_count))
            .filter(users::last_generation_at.eq(observed.last_generation_at)),
    )
    .set((
        users::generation_count.eq(next.generation_count),
        users::last_generation_at.eq(next.last_generation_at),
    ))
    .execute(conn)?;
    Ok(updated == 1)
}
