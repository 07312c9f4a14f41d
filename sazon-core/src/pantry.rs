//! Merge rule for adding stock to a user's pantry.
//!
//! Units are compared case-insensitively. Matching units accumulate; a different
//! unit replaces the stored quantity and unit outright. No unit conversion is
//! attempted.

#[derive(Debug, Clone, PartialEq)]
pub struct PantryStock {
    pub quantity: f64,
    pub unit_of_measure: String,
}

impl PantryStock {
    pub fn new(quantity: f64, unit_of_measure: impl Into<String>) -> Self {
        Self {
            quantity,
            unit_of_measure: unit_of_measure.into(),
        }
    }
}

pub fn units_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Combine the stock already in the pantry with an incoming addition.
pub fn merge_stock(existing: &PantryStock, incoming: &PantryStock) -> PantryStock {
    if units_match(&existing.unit_of_measure, &incoming.unit_of_measure) {
        PantryStock {
            quantity: existing.quantity + incoming.quantity,
            unit_of_measure: incoming.unit_of_measure.clone(),
        }
    } else {
        incoming.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_unit_accumulates() {
        let merged = merge_stock(&PantryStock::new(2.0, "kg"), &PantryStock::new(3.0, "kg"));
        assert_eq!(merged, PantryStock::new(5.0, "kg"));
    }

    #[test]
    fn test_unit_comparison_ignores_case() {
        let merged = merge_stock(&PantryStock::new(1.5, "Tazas"), &PantryStock::new(1.0, "tazas"));
        assert_eq!(merged.quantity, 2.5);
        assert_eq!(merged.unit_of_measure, "tazas");
    }

    #[test]
    fn test_different_unit_overwrites() {
        let merged = merge_stock(&PantryStock::new(5.0, "kg"), &PantryStock::new(3.0, "cups"));
        assert_eq!(merged, PantryStock::new(3.0, "cups"));
    }
}
