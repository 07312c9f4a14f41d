use crate::error::ApiError;
use crate::models::{NewPantryItem, PantryItem};
use crate::schema::{ingredients, user_pantry_items};
use diesel::prelude::*;
use sazon_core::{merge_stock, PantryStock};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ingredients as ingredient_dictionary;

/// A pantry row joined with its ingredient name.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PantryEntry {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit_of_measure: String,
}

impl PantryEntry {
    fn from_row(item: PantryItem, name: String) -> Self {
        Self {
            id: item.id,
            ingredient_id: item.ingredient_id,
            name,
            quantity: item.quantity,
            unit_of_measure: item.unit_of_measure,
        }
    }
}

/// Add stock for one ingredient. See [`sazon_core::pantry`] for how it
/// combines with what the user already has.
pub fn add(
    conn: &mut PgConnection,
    user_id: Uuid,
    name: &str,
    incoming: &PantryStock,
) -> Result<PantryEntry, ApiError> {
    conn.transaction(|conn| {
        let ingredient_id = ingredient_dictionary::resolve(conn, name)?;

        let existing = user_pantry_items::table
            .filter(user_pantry_items::user_id.eq(user_id))
            .filter(user_pantry_items::ingredient_id.eq(ingredient_id))
            .select(PantryItem::as_select())
            .for_update()
            .first(conn)
            .optional()?;

        let item = match existing {
            None => diesel::insert_into(user_pantry_items::table)
                .values(&NewPantryItem {
                    user_id,
                    ingredient_id,
                    quantity: incoming.quantity,
                    unit_of_measure: &incoming.unit_of_measure,
                })
                .returning(PantryItem::as_returning())
                .get_result(conn)?,
            Some(current) => {
                let merged = merge_stock(
                    &PantryStock::new(current.quantity, current.unit_of_measure),
                    incoming,
                );
                diesel::update(user_pantry_items::table.find(current.id))
                    .set((
                        user_pantry_items::quantity.eq(merged.quantity),
                        user_pantry_items::unit_of_measure.eq(&merged.unit_of_measure),
                    ))
                    .returning(PantryItem::as_returning())
                    .get_result(conn)?
            }
        };

        Ok(PantryEntry::from_row(
            item,
            ingredient_dictionary::normalize_name(name),
        ))
    })
}

/// The user's pantry, alphabetical by ingredient.
pub fn list(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<PantryEntry>, ApiError> {
    let rows = user_pantry_items::table
        .inner_join(ingredients::table)
        .filter(user_pantry_items::user_id.eq(user_id))
        .order(ingredients::name.asc())
        .select((PantryItem::as_select(), ingredients::name))
        .load::<(PantryItem, String)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(item, name)| PantryEntry::from_row(item, name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::store::users::tests::insert_user;

    fn stock(quantity: f64, unit: &str) -> PantryStock {
        PantryStock::new(quantity, unit)
    }

    #[test]
    fn test_accumulate_then_overwrite() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = insert_user(&mut conn, "pantry@example.com");

        let first = add(&mut conn, user, "Flour", &stock(2.0, "kg")).unwrap();
        let second = add(&mut conn, user, "flour", &stock(3.0, "kg")).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 5.0);
        assert_eq!(second.unit_of_measure, "kg");
        assert_eq!(second.name, "flour");

        let third = add(&mut conn, user, "FLOUR", &stock(3.0, "cups")).unwrap();
        assert_eq!(third.id, first.id);
        assert_eq!(third.quantity, 3.0);
        assert_eq!(third.unit_of_measure, "cups");

        let items = list(&mut conn, user).unwrap();
        assert_eq!(items, vec![third]);
    }

    #[test]
    fn test_unit_match_ignores_case() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = insert_user(&mut conn, "units@example.com");

        add(&mut conn, user, "Milk", &stock(1.0, "L")).unwrap();
        let merged = add(&mut conn, user, "Milk", &stock(0.5, "l")).unwrap();

        assert_eq!(merged.quantity, 1.5);
        assert_eq!(merged.unit_of_measure, "l");
    }

    #[test]
    fn test_pantries_are_per_user() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let ana = insert_user(&mut conn, "ana@example.com");
        let ben = insert_user(&mut conn, "ben@example.com");

        add(&mut conn, ana, "Eggs", &stock(6.0, "units")).unwrap();
        add(&mut conn, ben, "Eggs", &stock(12.0, "units")).unwrap();
        add(&mut conn, ana, "Butter", &stock(250.0, "g")).unwrap();

        let names: Vec<_> = list(&mut conn, ana)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["butter", "eggs"]);
        assert_eq!(list(&mut conn, ben).unwrap()[0].quantity, 12.0);
    }

    #[test]
    fn test_long_names_and_units_are_stored() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = insert_user(&mut conn, "verbose@example.com");
        let unit = "heaped tablespoons, loosely packed ".repeat(3);
        let name = "Smoked ".repeat(50) + "Paprika";

        let entry = add(&mut conn, user, &name, &stock(1.0, &unit)).unwrap();

        assert_eq!(entry.unit_of_measure, unit);
        assert_eq!(entry.name, name.to_lowercase());
    }
}
