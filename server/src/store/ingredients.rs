use crate::schema::ingredients;
use diesel::pg::upsert::excluded;
use diesel::prelude::*;
use uuid::Uuid;

/// Dictionary key for an ingredient name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Find the shared ingredient with this name, creating it if needed.
///
/// The no-op update makes `RETURNING` yield the id on conflict too, and lets
/// concurrent callers converge on one row via the unique index.
pub fn resolve(conn: &mut PgConnection, name: &str) -> QueryResult<Uuid> {
    diesel::insert_into(ingredients::table)
        .values(ingredients::name.eq(normalize_name(name)))
        .on_conflict(ingredients::name)
        .do_update()
        .set(ingredients::name.eq(excluded(ingredients::name)))
        .returning(ingredients::id)
        .get_result(conn)
}
