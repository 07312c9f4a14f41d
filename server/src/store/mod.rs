//! Database access. Every function takes a connection, runs its writes in one
//! diesel transaction and returns plain values or an `ApiError`.

pub mod ingredients;
pub mod pantry;
pub mod recipes;
pub mod users;
