//! # Flour Blend Balancer
//!
//! Keeps the flour blend summing to 100%: secondary flours keep the
//! percentages they were given and the main flour takes whatever is left.
//!
//! ## Rules
//!
//! - Secondary flours may take at most [`MAX_SECONDARY_FLOUR_PCT`] of the blend.
//!   Anything above that is capped by scaling the secondaries down
//!   proportionally, so the main flour never drops below 5%
//! - Negative or non-finite secondary percentages count as 0
//! - Non-flour ingredients are never touched
//! - Balancing a balanced set changes nothing
//!
//! ## Example
//!
//! ```rust
//! use dough_core::calculations::blend::balance;
//! use dough_core::recipe::{IngredientConfig, IngredientSet};
//!
//! let mut set = IngredientSet::new();
//! set.insert(IngredientConfig::flour("tipo_00", "Tipo 00", 100.0)).unwrap();
//! set.insert(IngredientConfig::flour("whole_wheat", "Whole Wheat", 20.0)).unwrap();
//!
//! let balanced = balance(&set, "tipo_00");
//! assert_eq!(balanced.get("tipo_00").unwrap().baker_percentage, 80.0);
//! ```

use crate::recipe::IngredientSet;

/// Largest share the secondary flours may take together (%)
pub const MAX_SECONDARY_FLOUR_PCT: f64 = 95.0;

/// Allowed drift of the flour sum from 100%
pub const FLOUR_SUM_TOLERANCE: f64 = 0.01;

/// Slack below which an over-cap sum is treated as exactly at the cap
const CLAMP_EPSILON: f64 = 1e-9;

/// Rebalance the flour blend around `main_flour_id`.
///
/// Returns the input unchanged if the main flour is missing or is not a
/// flour; that is a caller error the validation layer reports.
pub fn balance(ingredients: &IngredientSet, main_flour_id: &str) -> IngredientSet {
    let mut balanced = ingredients.clone();

    if !ingredients.get(main_flour_id).is_some_and(|i| i.is_flour()) {
        tracing::warn!(main_flour_id, "main flour missing from blend, skipping balance");
        return balanced;
    }

    let secondary_ids: Vec<String> = ingredients
        .flours()
        .filter(|f| f.id != main_flour_id)
        .map(|f| f.id.clone())
        .collect();

    let mut secondary_sum = 0.0;
    for id in &secondary_ids {
        if let Some(flour) = balanced.get_mut(id) {
            if !flour.baker_percentage.is_finite() || flour.baker_percentage < 0.0 {
                flour.baker_percentage = 0.0;
            }
            secondary_sum += flour.baker_percentage;
        }
    }

    if secondary_sum > MAX_SECONDARY_FLOUR_PCT + CLAMP_EPSILON {
        let scale = MAX_SECONDARY_FLOUR_PCT / secondary_sum;
        tracing::debug!(
            requested = secondary_sum,
            cap = MAX_SECONDARY_FLOUR_PCT,
            "secondary flours over cap, scaling down"
        );
        secondary_sum = 0.0;
        for id in &secondary_ids {
            if let Some(flour) = balanced.get_mut(id) {
                flour.baker_percentage *= scale;
                secondary_sum += flour.baker_percentage;
            }
        }
    }

    if let Some(main) = balanced.get_mut(main_flour_id) {
        main.baker_percentage = 100.0 - secondary_sum;
        main.manual_override = false;
    }

    balanced
}

/// Whether the flour percentages sum to 100 within [`FLOUR_SUM_TOLERANCE`].
pub fn is_balanced(ingredients: &IngredientSet) -> bool {
    (ingredients.flour_percentage_sum() - 100.0).abs() <= FLOUR_SUM_TOLERANCE
}
