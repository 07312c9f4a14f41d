use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub profile_picture_url: Option<String>,
    pub generation_count: i32,
    pub last_generation_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct ProfileChanges<'a> {
    pub name: Option<&'a str>,
    pub profile_picture_url: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub preparation_time_minutes: i32,
    pub meal_type: String,
    pub visibility: String,
    pub instructions: Vec<Option<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub image_url: &'a str,
    pub preparation_time_minutes: i32,
    pub meal_type: &'a str,
    pub visibility: &'a str,
    pub instructions: &'a [Option<String>],
}

/// Scalar recipe fields to overwrite; `None` fields are left untouched.
#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub preparation_time_minutes: Option<i32>,
    pub meal_type: Option<&'a str>,
    pub visibility: Option<&'a str>,
    pub instructions: Option<&'a [Option<String>]>,
}

impl RecipeChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.preparation_time_minutes.is_none()
            && self.meal_type.is_none()
            && self.visibility.is_none()
            && self.instructions.is_none()
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient<'a> {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Option<f64>,
    pub unit_of_measure: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipe_media)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeMedia {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub url: String,
    pub media_type: String,
    pub display_order: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_media)]
pub struct NewRecipeMedia<'a> {
    pub recipe_id: Uuid,
    pub url: &'a str,
    pub media_type: &'a str,
    pub display_order: i32,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::user_pantry_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct PantryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit_of_measure: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_pantry_items)]
pub struct NewPantryItem<'a> {
    pub user_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit_of_measure: &'a str,
}
