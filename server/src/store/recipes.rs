use crate::error::ApiError;
use crate::models::{
    NewRecipe, NewRecipeIngredient, NewRecipeMedia, Recipe, RecipeChanges, RecipeMedia,
};
use crate::schema::{ingredients, recipe_ingredients, recipe_media, recipes, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use sazon_core::types::UnknownVariant;
use sazon_core::{split_page, Cursor, Keyed, MealType, MediaType, Page, Visibility};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ingredients as ingredient_dictionary;

pub const RECIPE_NOT_FOUND: &str = "Recipe not found";

/// One ingredient line as submitted. `quantity` is `None` when the amount is
/// qualitative and `unit_of_measure` carries the description.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLine {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub url: String,
    pub media_type: MediaType,
    pub display_order: i32,
}

#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub preparation_time_minutes: i32,
    pub meal_type: MealType,
    pub visibility: Visibility,
    pub instructions: Vec<String>,
    pub ingredients: Vec<IngredientLine>,
    pub media: Vec<MediaItem>,
}

/// Fields left as `None` are not touched. `ingredients` and `media`, when
/// present, replace the whole collection.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub preparation_time_minutes: Option<i32>,
    pub meal_type: Option<MealType>,
    pub visibility: Option<Visibility>,
    pub instructions: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub media: Option<Vec<MediaItem>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeOwner {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecipeIngredientView {
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecipeMediaView {
    pub id: Uuid,
    pub url: String,
    pub media_type: MediaType,
    pub display_order: i32,
}

/// A recipe with its ingredients, media (in display order) and owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub preparation_time_minutes: i32,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub visibility: Visibility,
    pub instructions: Vec<String>,
    pub owner: RecipeOwner,
    pub ingredients: Vec<RecipeIngredientView>,
    pub media: Vec<RecipeMediaView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection. Ingredients and media are not included.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Keyed for RecipeSummary {
    fn cursor(&self) -> Cursor {
        Cursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

fn to_column(instructions: &[String]) -> Vec<Option<String>> {
    instructions.iter().cloned().map(Some).collect()
}

fn parse_stored<T: std::str::FromStr<Err = UnknownVariant>>(value: &str) -> Result<T, ApiError> {
    value
        .parse()
        .map_err(|e: UnknownVariant| ApiError::internal(e.to_string()))
}

fn insert_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    lines: &[IngredientLine],
) -> QueryResult<()> {
    for line in lines {
        let ingredient_id = ingredient_dictionary::resolve(conn, &line.name)?;
        diesel::insert_into(recipe_ingredients::table)
            .values(&NewRecipeIngredient {
                recipe_id,
                ingredient_id,
                quantity: line.quantity,
                unit_of_measure: &line.unit_of_measure,
            })
            .execute(conn)?;
    }
    Ok(())
}

fn insert_media(conn: &mut PgConnection, recipe_id: Uuid, media: &[MediaItem]) -> QueryResult<()> {
    if media.is_empty() {
        return Ok(());
    }

    let rows: Vec<NewRecipeMedia> = media
        .iter()
        .map(|item| NewRecipeMedia {
            recipe_id,
            url: &item.url,
            media_type: item.media_type.as_str(),
            display_order: item.display_order,
        })
        .collect();

    diesel::insert_into(recipe_media::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn load_detail(conn: &mut PgConnection, recipe: Recipe) -> Result<RecipeDetail, ApiError> {
    let owner = users::table
        .find(recipe.user_id)
        .select((users::id, users::name))
        .first::<(Uuid, String)>(conn)
        .map(|(id, name)| RecipeOwner { id, name })?;

    let ingredients = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(recipe.id))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::ingredient_id,
            ingredients::name,
            recipe_ingredients::quantity,
            recipe_ingredients::unit_of_measure,
        ))
        .load::<(Uuid, String, Option<f64>, String)>(conn)?
        .into_iter()
        .map(
            |(ingredient_id, name, quantity, unit_of_measure)| RecipeIngredientView {
                ingredient_id,
                name,
                quantity,
                unit_of_measure,
            },
        )
        .collect();

    let media = recipe_media::table
        .filter(recipe_media::recipe_id.eq(recipe.id))
        .order((recipe_media::display_order.asc(), recipe_media::id.asc()))
        .select(RecipeMedia::as_select())
        .load(conn)?
        .into_iter()
        .map(|m| {
            Ok(RecipeMediaView {
                id: m.id,
                media_type: parse_stored(&m.media_type)?,
                url: m.url,
                display_order: m.display_order,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(RecipeDetail {
        id: recipe.id,
        meal_type: parse_stored(&recipe.meal_type)?,
        visibility: parse_stored(&recipe.visibility)?,
        name: recipe.name,
        description: recipe.description,
        image_url: recipe.image_url,
        preparation_time_minutes: recipe.preparation_time_minutes,
        instructions: recipe.instructions.into_iter().flatten().collect(),
        owner,
        ingredients,
        media,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    })
}

/// Insert a recipe with its ingredient lines and media as one unit.
pub fn create(
    conn: &mut PgConnection,
    user_id: Uuid,
    input: &RecipeInput,
) -> Result<RecipeDetail, ApiError> {
    conn.transaction(|conn| {
        let instructions = to_column(&input.instructions);
        let recipe = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                user_id,
                name: &input.name,
                description: &input.description,
                image_url: &input.image_url,
                preparation_time_minutes: input.preparation_time_minutes,
                meal_type: input.meal_type.as_str(),
                visibility: input.visibility.as_str(),
                instructions: &instructions,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        insert_ingredients(conn, recipe.id, &input.ingredients)?;
        insert_media(conn, recipe.id, &input.media)?;

        load_detail(conn, recipe)
    })
}

/// One page of public recipes, newest first.
pub fn find_public(
    conn: &mut PgConnection,
    limit: i64,
    cursor: Option<Cursor>,
) -> Result<Page<RecipeSummary>, ApiError> {
    let mut query = recipes::table
        .filter(recipes::visibility.eq(Visibility::Public.as_str()))
        .select(RecipeSummary::as_select())
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .limit(limit + 1)
        .into_boxed();

    if let Some(cursor) = cursor {
        query = query.filter(
            recipes::created_at.lt(cursor.created_at).or(recipes::created_at
                .eq(cursor.created_at)
                .and(recipes::id.lt(cursor.id))),
        );
    }

    let rows = query.load(conn)?;
    Ok(split_page(rows, limit as usize))
}

/// A recipe the viewer may read: public ones, or their own. Anything else is
/// reported exactly like a missing recipe.
pub fn find_by_id(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    viewer_id: Option<Uuid>,
) -> Result<RecipeDetail, ApiError> {
    let recipe = recipes::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .filter(|r| r.visibility == Visibility::Public.as_str() || Some(r.user_id) == viewer_id)
        .ok_or_else(|| ApiError::not_found(RECIPE_NOT_FOUND))?;

    load_detail(conn, recipe)
}

fn lock_owned(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<Recipe, ApiError> {
    recipes::table
        .filter(recipes::id.eq(recipe_id))
        .filter(recipes::user_id.eq(user_id))
        .select(Recipe::as_select())
        .for_update()
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found(RECIPE_NOT_FOUND))
}

pub fn update_by_id(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: Uuid,
    patch: &RecipePatch,
) -> Result<RecipeDetail, ApiError> {
    conn.transaction(|conn| {
        let mut recipe = lock_owned(conn, user_id, recipe_id)?;

        let instructions = patch.instructions.as_deref().map(to_column);
        let changes = RecipeChanges {
            name: patch.name.as_deref(),
            description: patch.description.as_deref(),
            image_url: patch.image_url.as_deref(),
            preparation_time_minutes: patch.preparation_time_minutes,
            meal_type: patch.meal_type.as_ref().map(MealType::as_str),
            visibility: patch.visibility.as_ref().map(Visibility::as_str),
            instructions: instructions.as_deref(),
        };

        if !changes.is_empty() {
            recipe = diesel::update(recipes::table.find(recipe_id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)?;
        }

        if let Some(lines) = &patch.ingredients {
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            insert_ingredients(conn, recipe_id, lines)?;
        }

        if let Some(media) = &patch.media {
            diesel::delete(recipe_media::table.filter(recipe_media::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            insert_media(conn, recipe_id, media)?;
        }

        if changes.is_empty() && (patch.ingredients.is_some() || patch.media.is_some()) {
            recipe = diesel::update(recipes::table.find(recipe_id))
                .set(recipes::updated_at.eq(diesel::dsl::now))
                .returning(Recipe::as_returning())
                .get_result(conn)?;
        }

        load_detail(conn, recipe)
    })
}

/// Delete a recipe and its child rows. Nothing is removed unless the caller
/// owns it.
pub fn delete_by_id(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<(), ApiError> {
    conn.transaction(|conn| {
        lock_owned(conn, user_id, recipe_id)?;

        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        diesel::delete(recipe_media::table.filter(recipe_media::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        diesel::delete(
            recipes::table
                .filter(recipes::id.eq(recipe_id))
                .filter(recipes::user_id.eq(user_id)),
        )
        .execute(conn)?;

        Ok(())
    })
}
