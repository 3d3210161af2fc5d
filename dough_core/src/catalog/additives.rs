//! Additional Ingredient Library
//!
//! Non-flour ingredients with bulk densities for volume conversion. The first
//! five entries are the named scalar ingredients of every recipe; the rest are
//! extras a user can add as free-form lines.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::recipe::IngredientType;

/// Read-only definition of a non-flour ingredient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdditiveDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: IngredientType,
    /// Bulk density in g/ml; `None` when volume measures make no sense
    pub density_g_per_ml: Option<f64>,
    /// Typical baker's percentage when first added to a recipe
    pub default_percentage: f64,
}

static ADDITIVES: [AdditiveDefinition; 14] = [
    AdditiveDefinition {
        id: "water",
        name: "Water",
        kind: IngredientType::Liquid,
        density_g_per_ml: Some(1.0),
        default_percentage: 65.0,
    },
    AdditiveDefinition {
        id: "salt",
        name: "Salt",
        kind: IngredientType::Solid,
        density_g_per_ml: Some(1.2),
        default_percentage: 2.5,
    },
    AdditiveDefinition {
        id: "oil",
        name: "Oil",
        kind: IngredientType::Liquid,
        density_g_per_ml: Some(0.92),
        default_percentage: 0.0,
    },
    AdditiveDefinition {
        id: "sugar",
        name: "Sugar",
        kind: IngredientType::Solid,
        density_g_per_ml: Some(0.85),
        default_percentage: 0.0,
    },
    AdditiveDefinition {
        id: "yeast",
        name: "Yeast",
        kind: IngredientType::Solid,
        density_g_per_ml: Some(0.64),
        default_percentage: 0.2,
    },
    AdditiveDefinition {
        id: "olive_oil",
        name: "Extra Virgin Olive Oil",
        kind: IngredientType::Liquid,
        density_g_per_ml: Some(0.91),
        default_percentage: 3.0,
    },
    AdditiveDefinition {
        id: "milk",
        name: "Whole Milk",
        kind: IngredientType::Liquid,
        density_g_per_ml: Some(1.03),
        default_percentage: 10.0,
    },
    AdditiveDefinition {
        id: "honey",
        name: "Honey",
        kind: IngredientType::Liquid,
        density_g_per_ml: Some(1.42),
        default_percentage: 2.0,
    },
    AdditiveDefinition {
        id: "barley_malt_syrup",
        name: "Barley Malt Syrup",
        kind: IngredientType::Liquid,
        density_g_per_ml: Some(1.4),
        default_percentage: 1.0,
    },
    AdditiveDefinition {
        id: "diastatic_malt",
        name: "Diastatic Malt Powder",
        kind: IngredientType::Solid,
        density_g_per_ml: Some(0.6),
        default_percentage: 0.5,
    },
    AdditiveDefinition {
        id: "butter",
        name: "Butter",
        kind: IngredientType::Solid,
        density_g_per_ml: Some(0.911),
        default_percentage: 5.0,
    },
    AdditiveDefinition {
        id: "lard",
        name: "Lard",
        kind: IngredientType::Solid,
        density_g_per_ml: Some(0.92),
        default_percentage: 3.0,
    },
    AdditiveDefinition {
        id: "egg",
        name: "Whole Egg",
        kind: IngredientType::Liquid,
        density_g_per_ml: Some(1.03),
        default_percentage: 10.0,
    },
    AdditiveDefinition {
        id: "vital_wheat_gluten",
        name: "Vital Wheat Gluten",
        kind: IngredientType::Solid,
        density_g_per_ml: Some(0.6),
        default_percentage: 2.0,
    },
];

static ADDITIVE_INDEX: Lazy<HashMap<&'static str, &'static AdditiveDefinition>> =
    Lazy::new(|| ADDITIVES.iter().map(|a| (a.id, a)).collect());

/// All additive definitions in catalog order
pub fn all_additives() -> &'static [AdditiveDefinition] {
    &ADDITIVES
}

/// Exact lookup by id
pub fn find_additive(id: &str) -> Option<&'static AdditiveDefinition> {
    ADDITIVE_INDEX.get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_eq!(ADDITIVE_INDEX.len(), ADDITIVES.len());
    }

    #[test]
    fn test_scalar_ingredients_present() {
        for id in ["water", "salt", "oil", "sugar", "yeast"] {
            assert!(find_additive(id).is_some(), "missing {id}");
        }
    }

    #[test]
    fn test_every_additive_has_positive_density() {
        for additive in all_additives() {
            let density = additive.density_g_per_ml.unwrap();
            assert!(density > 0.0, "{} has density {}", additive.id, density);
        }
    }
}
