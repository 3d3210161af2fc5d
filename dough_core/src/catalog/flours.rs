//! Flour Library
//!
//! Technical reference values for common bread and pizza flours. Strength (W)
//! is the alveograph index printed on Italian flour bags; North American
//! flours are given an equivalent estimate. Rye and similar low-gluten flours
//! carry no W and fall back to [`DEFAULT_STRENGTH_W`] when blended.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Strength assumed when a definition has no W value
pub const DEFAULT_STRENGTH_W: f64 = 200.0;

/// Protein percentage assumed when a definition has none
pub const DEFAULT_PROTEIN_PCT: f64 = 10.0;

/// Id of the fallback definition for unrecognised flours
pub const GENERIC_FLOUR_ID: &str = "generic_all_purpose";

/// Broad flour families for UI grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlourCategory {
    AllPurpose,
    Italian,
    Bread,
    WholeGrain,
    Durum,
    Rye,
    AncientGrain,
}

impl FlourCategory {
    /// All categories for UI selection
    pub const ALL: [FlourCategory; 7] = [
        FlourCategory::AllPurpose,
        FlourCategory::Italian,
        FlourCategory::Bread,
        FlourCategory::WholeGrain,
        FlourCategory::Durum,
        FlourCategory::Rye,
        FlourCategory::AncientGrain,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FlourCategory::AllPurpose => "All-Purpose",
            FlourCategory::Italian => "Italian Soft Wheat",
            FlourCategory::Bread => "Bread",
            FlourCategory::WholeGrain => "Whole Grain",
            FlourCategory::Durum => "Durum",
            FlourCategory::Rye => "Rye",
            FlourCategory::AncientGrain => "Ancient Grain",
        }
    }
}

impl std::fmt::Display for FlourCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Recommended hydration window in baker's percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrationRange {
    pub min: f64,
    pub max: f64,
}

impl HydrationRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether a hydration value falls inside the window (inclusive)
    pub fn contains(&self, hydration: f64) -> bool {
        hydration >= self.min && hydration <= self.max
    }
}

/// Read-only technical definition of a flour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlourDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: FlourCategory,
    /// Alveograph strength W, if the mill publishes one
    pub strength_w: Option<f64>,
    /// Protein content (% of flour mass)
    pub protein_pct: Option<f64>,
    pub hydration_hint: HydrationRange,
}

impl FlourDefinition {
    /// Strength W with the catalog default applied
    pub fn strength(&self) -> f64 {
        self.strength_w.unwrap_or(DEFAULT_STRENGTH_W)
    }

    /// Protein percentage with the catalog default applied
    pub fn protein(&self) -> f64 {
        self.protein_pct.unwrap_or(DEFAULT_PROTEIN_PCT)
    }
}

static FLOURS: [FlourDefinition; 12] = [
    FlourDefinition {
        id: GENERIC_FLOUR_ID,
        name: "All-Purpose Flour",
        category: FlourCategory::AllPurpose,
        strength_w: None,
        protein_pct: None,
        hydration_hint: HydrationRange::new(55.0, 65.0),
    },
    FlourDefinition {
        id: "tipo_00_pizzeria",
        name: "Tipo 00 Pizzeria",
        category: FlourCategory::Italian,
        strength_w: Some(260.0),
        protein_pct: Some(12.0),
        hydration_hint: HydrationRange::new(58.0, 65.0),
    },
    FlourDefinition {
        id: "tipo_00",
        name: "Tipo 00",
        category: FlourCategory::Italian,
        strength_w: Some(220.0),
        protein_pct: Some(11.0),
        hydration_hint: HydrationRange::new(55.0, 62.0),
    },
    FlourDefinition {
        id: "manitoba",
        name: "Manitoba",
        category: FlourCategory::Italian,
        strength_w: Some(380.0),
        protein_pct: Some(14.0),
        hydration_hint: HydrationRange::new(65.0, 80.0),
    },
    FlourDefinition {
        id: "tipo_0",
        name: "Tipo 0",
        category: FlourCategory::Italian,
        strength_w: Some(250.0),
        protein_pct: Some(11.5),
        hydration_hint: HydrationRange::new(58.0, 68.0),
    },
    FlourDefinition {
        id: "tipo_1",
        name: "Tipo 1",
        category: FlourCategory::Italian,
        strength_w: Some(230.0),
        protein_pct: Some(11.5),
        hydration_hint: HydrationRange::new(62.0, 72.0),
    },
    FlourDefinition {
        id: "tipo_2",
        name: "Tipo 2",
        category: FlourCategory::Italian,
        strength_w: Some(210.0),
        protein_pct: Some(12.0),
        hydration_hint: HydrationRange::new(65.0, 75.0),
    },
    FlourDefinition {
        id: "bread_flour",
        name: "Bread Flour",
        category: FlourCategory::Bread,
        strength_w: Some(300.0),
        protein_pct: Some(12.7),
        hydration_hint: HydrationRange::new(62.0, 72.0),
    },
    FlourDefinition {
        id: "whole_wheat",
        name: "Whole Wheat",
        category: FlourCategory::WholeGrain,
        strength_w: Some(180.0),
        protein_pct: Some(13.0),
        hydration_hint: HydrationRange::new(70.0, 85.0),
    },
    FlourDefinition {
        id: "semola_rimacinata",
        name: "Semola Rimacinata",
        category: FlourCategory::Durum,
        strength_w: Some(180.0),
        protein_pct: Some(12.5),
        hydration_hint: HydrationRange::new(60.0, 70.0),
    },
    FlourDefinition {
        id: "whole_rye",
        name: "Whole Rye",
        category: FlourCategory::Rye,
        strength_w: None,
        protein_pct: Some(9.0),
        hydration_hint: HydrationRange::new(75.0, 90.0),
    },
    FlourDefinition {
        id: "spelt",
        name: "Spelt",
        category: FlourCategory::AncientGrain,
        strength_w: Some(130.0),
        protein_pct: Some(12.0),
        hydration_hint: HydrationRange::new(60.0, 70.0),
    },
];

static FLOUR_INDEX: Lazy<HashMap<&'static str, &'static FlourDefinition>> =
    Lazy::new(|| FLOURS.iter().map(|f| (f.id, f)).collect());

/// All flour definitions in catalog order
pub fn all_flours() -> &'static [FlourDefinition] {
    &FLOURS
}

/// Exact lookup by id
pub fn find_flour(id: &str) -> Option<&'static FlourDefinition> {
    FLOUR_INDEX.get(id).copied()
}

/// Lookup by id, falling back to the generic all-purpose definition
pub fn flour_or_generic(id: &str) -> &'static FlourDefinition {
    match find_flour(id) {
        Some(def) => def,
        None => {
            tracing::debug!(flour_id = id, "unknown flour, using generic definition");
            &FLOURS[0]
        }
    }
}

/// Flours belonging to one category, in catalog order
pub fn flours_by_category(category: FlourCategory) -> Vec<&'static FlourDefinition> {
    FLOURS.iter().filter(|f| f.category == category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_eq!(FLOUR_INDEX.len(), FLOURS.len());
    }

    #[test]
    fn test_generic_defaults() {
        let generic = flour_or_generic(GENERIC_FLOUR_ID);
        assert_eq!(generic.strength(), DEFAULT_STRENGTH_W);
        assert_eq!(generic.protein(), DEFAULT_PROTEIN_PCT);
    }

    #[test]
    fn test_fallback_for_unknown_id() {
        assert!(find_flour("my_custom_mill").is_none());
        assert_eq!(flour_or_generic("my_custom_mill").id, GENERIC_FLOUR_ID);
    }

    #[test]
    fn test_rye_has_no_strength() {
        let rye = find_flour("whole_rye").unwrap();
        assert!(rye.strength_w.is_none());
        assert_eq!(rye.strength(), DEFAULT_STRENGTH_W);
        assert_eq!(rye.protein(), 9.0);
    }

    #[test]
    fn test_by_category() {
        let italian = flours_by_category(FlourCategory::Italian);
        let expected = FLOURS.iter().filter(|f| f.category == FlourCategory::Italian).count();
        assert!(expected > 0);
        assert_eq!(italian.len(), expected);
        assert!(italian.iter().all(|f| f.category == FlourCategory::Italian));
    }

    #[test]
    fn test_hydration_range() {
        let hint = find_flour("manitoba").unwrap().hydration_hint;
        assert!(hint.contains(70.0));
        assert!(!hint.contains(60.0));
    }
}
