//! # Blend Characteristic Estimator
//!
//! Percentage-weighted strength (W) and protein across the flour blend. The
//! numbers are guidance for the baker only; the formulation engine never
//! reads them.

use serde::{Deserialize, Serialize};

use crate::catalog::{find_flour, flour_or_generic, HydrationRange};
use crate::recipe::IngredientSet;

/// A flour counts toward the composite name above this share (%)
pub const SIGNIFICANT_SHARE_PCT: f64 = 5.0;

/// Label for blends with more than one significant flour
pub const CUSTOM_BLEND_NAME: &str = "Custom Blend";

/// Label for an empty blend
pub const NO_FLOUR_NAME: &str = "No Flour";

/// Estimated characteristics of a flour blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendResult {
    /// Weighted strength W, rounded to an integer
    pub estimated_w: u32,
    /// Weighted protein %, rounded to one decimal
    pub estimated_protein: f64,
    /// Display label for the blend
    pub composite_name: String,
    /// Weighted hydration window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration_hint: Option<HydrationRange>,
}

impl BlendResult {
    /// Result for a blend with no flour weight at all
    pub fn empty() -> Self {
        BlendResult {
            estimated_w: 0,
            estimated_protein: 0.0,
            composite_name: NO_FLOUR_NAME.to_string(),
            hydration_hint: None,
        }
    }

    /// Rough strength class used on Italian flour bags
    pub fn strength_class(&self) -> &'static str {
        match self.estimated_w {
            0 => "Unknown",
            1..=170 => "Weak",
            171..=260 => "Medium",
            261..=340 => "Strong",
            _ => "Very strong",
        }
    }
}

/// Estimate W, protein and a display name for the flours in `ingredients`.
///
/// Unknown flour ids use the generic all-purpose definition.
pub fn estimate(ingredients: &IngredientSet) -> BlendResult {
    let mut total_pct = 0.0;
    let mut weighted_w = 0.0;
    let mut weighted_protein = 0.0;
    let mut weighted_min = 0.0;
    let mut weighted_max = 0.0;
    let mut significant = Vec::new();

    for flour in ingredients.flours() {
        let pct = flour.baker_percentage;
        if !pct.is_finite() || pct <= 0.0 {
            continue;
        }
        let def = flour_or_generic(&flour.id);
        total_pct += pct;
        weighted_w += def.strength() * pct;
        weighted_protein += def.protein() * pct;
        weighted_min += def.hydration_hint.min * pct;
        weighted_max += def.hydration_hint.max * pct;
        if pct > SIGNIFICANT_SHARE_PCT {
            significant.push(flour);
        }
    }

    if total_pct <= 0.0 {
        return BlendResult::empty();
    }

    let composite_name = match significant.as_slice() {
        [only] => match find_flour(&only.id) {
            Some(def) => def.name.to_string(),
            None => only.name.clone(),
        },
        _ => CUSTOM_BLEND_NAME.to_string(),
    };

    BlendResult {
        estimated_w: (weighted_w / total_pct).round() as u32,
        estimated_protein: round1(weighted_protein / total_pct),
        composite_name,
        hydration_hint: Some(HydrationRange::new(
            round1(weighted_min / total_pct),
            round1(weighted_max / total_pct),
        )),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::IngredientConfig;

    fn set_of(flours: &[(&str, f64)]) -> IngredientSet {
        let mut set = IngredientSet::new();
        for (id, pct) in flours {
            set.insert(IngredientConfig::from_catalog_flour(id, *pct)).unwrap();
        }
        set
    }

    #[test]
    fn test_empty_blend() {
        let result = estimate(&IngredientSet::new());
        assert_eq!(result.estimated_w, 0);
        assert_eq!(result.estimated_protein, 0.0);
        assert_eq!(result.composite_name, "No Flour");
        assert_eq!(result, BlendResult::empty());
    }

    #[test]
    fn test_zero_percentages_are_empty() {
        let result = estimate(&set_of(&[("tipo_00", 0.0)]));
        assert_eq!(result, BlendResult::empty());
    }

    #[test]
    fn test_single_flour() {
        let result = estimate(&set_of(&[("manitoba", 100.0)]));
        assert_eq!(result.estimated_w, 380);
        assert_eq!(result.estimated_protein, 14.0);
        assert_eq!(result.composite_name, "Manitoba");
        assert_eq!(result.hydration_hint, Some(HydrationRange::new(65.0, 80.0)));
        assert_eq!(result.strength_class(), "Very strong");
    }

    #[test]
    fn test_weighted_average() {
        let result = estimate(&set_of(&[("tipo_00_pizzeria", 80.0), ("whole_wheat", 20.0)]));
        assert_eq!(result.estimated_w, 244);
        assert_eq!(result.estimated_protein, 12.2);
        assert_eq!(result.composite_name, "Custom Blend");
    }

    #[test]
    fn test_trace_flour_keeps_single_name() {
        let result = estimate(&set_of(&[("bread_flour", 97.0), ("whole_rye", 3.0)]));
        assert_eq!(result.composite_name, "Bread Flour");
    }

    #[test]
    fn test_unknown_flour_uses_generic_values() {
        let mut set = IngredientSet::new();
        set.insert(IngredientConfig::flour("heritage_red_fife", "Red Fife", 100.0))
            .unwrap();
        let result = estimate(&set);
        assert_eq!(result.estimated_w, 200);
        assert_eq!(result.estimated_protein, 10.0);
        assert_eq!(result.composite_name, "Red Fife");
    }

    #[test]
    fn test_rye_uses_default_strength() {
        let result = estimate(&set_of(&[("whole_rye", 50.0), ("manitoba", 50.0)]));
        assert_eq!(result.estimated_w, 290);
        assert_eq!(result.estimated_protein, 11.5);
    }

    #[test]
    fn test_non_flours_ignored() {
        let mut set = set_of(&[("tipo_00", 100.0)]);
        set.insert(IngredientConfig::from_catalog_additive("milk").unwrap()).unwrap();
        let result = estimate(&set);
        assert_eq!(result.estimated_w, 220);
        assert_eq!(result.composite_name, "Tipo 00");
    }
}
