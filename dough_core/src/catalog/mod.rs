//! # Ingredient Catalog
//!
//! Static, read-only lookup tables keyed by id. Two libraries:
//!
//! - **Flours**: technical definitions (strength W, protein, hydration window)
//!   used by the blend estimator
//! - **Additives**: the named scalar ingredients (water, salt, oil, sugar, yeast)
//!   and common extras, with bulk densities for volume conversion
//!
//! ## Example
//!
//! ```rust
//! use dough_core::catalog::{flour_or_generic, density_for};
//!
//! let flour = flour_or_generic("tipo_00_pizzeria");
//! assert_eq!(flour.strength(), 260.0);
//!
//! // Unknown ids resolve to the generic all-purpose definition
//! let custom = flour_or_generic("grandmas_secret_flour");
//! assert_eq!(custom.id, "generic_all_purpose");
//!
//! assert_eq!(density_for("water"), Some(1.0));
//! ```

pub mod additives;
pub mod flours;

pub use additives::{find_additive, all_additives, AdditiveDefinition};
pub use flours::{
    all_flours, find_flour, flour_or_generic, flours_by_category, FlourCategory, FlourDefinition,
    HydrationRange, DEFAULT_PROTEIN_PCT, DEFAULT_STRENGTH_W, GENERIC_FLOUR_ID,
};

/// Bulk density of sifted wheat flour (g/ml), roughly 125 g per US cup
pub const FLOUR_DENSITY_G_PER_ML: f64 = 0.53;

/// Look up the bulk density of an ingredient in g/ml.
///
/// Additives carry their own density; anything in the flour catalog uses
/// [`FLOUR_DENSITY_G_PER_ML`]. Returns `None` for ids in neither library so
/// the caller can apply its own fallback.
pub fn density_for(ingredient_id: &str) -> Option<f64> {
    if let Some(additive) = find_additive(ingredient_id) {
        return additive.density_g_per_ml;
    }
    find_flour(ingredient_id).map(|_| FLOUR_DENSITY_G_PER_ML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_for_additive() {
        assert_eq!(density_for("olive_oil"), Some(0.91));
        assert_eq!(density_for("honey"), Some(1.42));
    }

    #[test]
    fn test_density_for_flour() {
        assert_eq!(density_for("bread_flour"), Some(FLOUR_DENSITY_G_PER_ML));
        assert_eq!(density_for(GENERIC_FLOUR_ID), Some(FLOUR_DENSITY_G_PER_ML));
    }

    #[test]
    fn test_density_unknown() {
        assert_eq!(density_for("unicorn_dust"), None);
    }
}
