//! # Units and Conversion
//!
//! Bidirectional conversion between an absolute mass in grams and the unit an
//! ingredient is displayed or edited in: baker's percent, mass units, or
//! kitchen volume measures.
//!
//! ## Rules
//!
//! - Percent is always relative to **total flour** mass, supplied by the caller
//!   through [`ConversionContext::total_flour_g`]
//! - Mass units (`g`, `kg`, `oz`, `lb`) use fixed physical constants
//! - Volume units (`ml`, `l`, `cup`, `tbsp`, `tsp`) go through the ingredient's
//!   catalog density; unknown ingredients are treated as water-dense
//!   (1 g/ml unless the context overrides it)
//! - Conversion never fails. Negative or non-finite input, or a percent
//!   conversion without a positive flour total, yields `0.0`
//!
//! ## Example
//!
//! ```rust
//! use dough_core::units::{to_mass, to_unit, ConversionContext, Unit, UnitSystem};
//!
//! let ctx = ConversionContext::new(UnitSystem::Metric).with_total_flour(500.0);
//!
//! // 65% hydration on 500 g flour
//! assert_eq!(to_mass(65.0, Unit::Percent, "water", &ctx), 325.0);
//!
//! // 2 tbsp of olive oil in grams
//! let grams = to_mass(2.0, Unit::Tablespoon, "olive_oil", &ctx);
//! assert!((grams - 27.3).abs() < 1e-9);
//!
//! // and back again
//! let tbsp = to_unit(grams, Unit::Tablespoon, "olive_oil", &ctx);
//! assert!((tbsp - 2.0).abs() < 1e-9);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::errors::FormulaError;

/// Density used when an ingredient has none in the catalog (g/ml)
pub const WATER_DENSITY_G_PER_ML: f64 = 1.0;

const GRAMS_PER_KILOGRAM: f64 = 1000.0;
const GRAMS_PER_OUNCE: f64 = 28.349523125;
const GRAMS_PER_POUND: f64 = 453.59237;
const ML_PER_LITER: f64 = 1000.0;

// ============================================================================
// Mass and Volume Newtypes
// ============================================================================

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in avoirdupois ounces
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ounces(pub f64);

/// Mass in avoirdupois pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Volume in milliliters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliliters(pub f64);

impl From<Kilograms> for Grams {
    fn from(kg: Kilograms) -> Self {
        Grams(kg.0 * GRAMS_PER_KILOGRAM)
    }
}

impl From<Grams> for Kilograms {
    fn from(g: Grams) -> Self {
        Kilograms(g.0 / GRAMS_PER_KILOGRAM)
    }
}

impl From<Ounces> for Grams {
    fn from(oz: Ounces) -> Self {
        Grams(oz.0 * GRAMS_PER_OUNCE)
    }
}

impl From<Grams> for Ounces {
    fn from(g: Grams) -> Self {
        Ounces(g.0 / GRAMS_PER_OUNCE)
    }
}

impl From<Pounds> for Grams {
    fn from(lb: Pounds) -> Self {
        Grams(lb.0 * GRAMS_PER_POUND)
    }
}

impl From<Grams> for Pounds {
    fn from(g: Grams) -> Self {
        Pounds(g.0 / GRAMS_PER_POUND)
    }
}

impl Milliliters {
    /// Mass of this volume at the given density
    pub fn to_grams(self, density_g_per_ml: f64) -> Grams {
        Grams(self.0 * density_g_per_ml)
    }

    /// Volume occupied by a mass at the given density
    pub fn from_grams(grams: Grams, density_g_per_ml: f64) -> Self {
        Milliliters(grams.0 / density_g_per_ml)
    }
}

// ============================================================================
// Display / Edit Units
// ============================================================================

/// Unit an ingredient amount is shown or edited in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "ml")]
    Milliliters,
    #[serde(rename = "l")]
    Liters,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
}

impl Unit {
    /// All units for UI selection
    pub const ALL: [Unit; 10] = [
        Unit::Percent,
        Unit::Grams,
        Unit::Kilograms,
        Unit::Milliliters,
        Unit::Liters,
        Unit::Cup,
        Unit::Tablespoon,
        Unit::Teaspoon,
        Unit::Ounce,
        Unit::Pound,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Percent => "%",
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Milliliters => "ml",
            Unit::Liters => "l",
            Unit::Cup => "cup",
            Unit::Tablespoon => "tbsp",
            Unit::Teaspoon => "tsp",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
        }
    }

    pub fn is_volume(&self) -> bool {
        matches!(
            self,
            Unit::Milliliters | Unit::Liters | Unit::Cup | Unit::Tablespoon | Unit::Teaspoon
        )
    }

    /// `amount` of this unit as grams, for mass units only
    fn to_grams(&self, amount: f64) -> Option<Grams> {
        match self {
            Unit::Grams => Some(Grams(amount)),
            Unit::Kilograms => Some(Kilograms(amount).into()),
            Unit::Ounce => Some(Ounces(amount).into()),
            Unit::Pound => Some(Pounds(amount).into()),
            _ => None,
        }
    }

    /// `grams` expressed in this unit, for mass units only
    fn from_grams(&self, grams: Grams) -> Option<f64> {
        match self {
            Unit::Grams => Some(grams.0),
            Unit::Kilograms => Some(Kilograms::from(grams).0),
            Unit::Ounce => Some(Ounces::from(grams).0),
            Unit::Pound => Some(Pounds::from(grams).0),
            _ => None,
        }
    }

    /// Milliliters per one of this unit, for volume units only
    fn ml_per_unit(&self, system: UnitSystem) -> Option<f64> {
        match self {
            Unit::Milliliters => Some(1.0),
            Unit::Liters => Some(ML_PER_LITER),
            Unit::Cup => Some(system.cup_ml()),
            Unit::Tablespoon => Some(system.tablespoon_ml()),
            Unit::Teaspoon => Some(system.teaspoon_ml()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Unit {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "%" | "pct" | "percent" => Ok(Unit::Percent),
            "g" | "gram" | "grams" => Ok(Unit::Grams),
            "kg" | "kilogram" | "kilograms" => Ok(Unit::Kilograms),
            "ml" | "milliliter" | "milliliters" => Ok(Unit::Milliliters),
            "l" | "liter" | "liters" => Ok(Unit::Liters),
            "cup" | "cups" => Ok(Unit::Cup),
            "tbsp" | "tablespoon" | "tablespoons" => Ok(Unit::Tablespoon),
            "tsp" | "teaspoon" | "teaspoons" => Ok(Unit::Teaspoon),
            "oz" | "ounce" | "ounces" => Ok(Unit::Ounce),
            "lb" | "lbs" | "pound" | "pounds" => Ok(Unit::Pound),
            _ => Err(FormulaError::unknown_unit(s)),
        }
    }
}

/// Which kitchen measure sizes cup/tbsp/tsp refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// 250 ml cup, 15 ml tablespoon, 5 ml teaspoon
    #[default]
    Metric,
    /// US customary cup (236.6 ml) and spoons
    UsCustomary,
}

impl UnitSystem {
    pub fn cup_ml(&self) -> f64 {
        match self {
            UnitSystem::Metric => 250.0,
            UnitSystem::UsCustomary => 236.5882365,
        }
    }

    pub fn tablespoon_ml(&self) -> f64 {
        match self {
            UnitSystem::Metric => 15.0,
            UnitSystem::UsCustomary => 14.78676478125,
        }
    }

    pub fn teaspoon_ml(&self) -> f64 {
        match self {
            UnitSystem::Metric => 5.0,
            UnitSystem::UsCustomary => 4.92892159375,
        }
    }
}

// ============================================================================
// Conversion Service
// ============================================================================

/// Everything a conversion needs besides the amount itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionContext {
    pub unit_system: UnitSystem,
    /// Total flour mass in grams; required for percent conversions
    pub total_flour_g: Option<f64>,
    /// Density applied to ingredients the catalog doesn't know
    pub fallback_density_g_per_ml: f64,
}

impl Default for ConversionContext {
    fn default() -> Self {
        ConversionContext {
            unit_system: UnitSystem::default(),
            total_flour_g: None,
            fallback_density_g_per_ml: WATER_DENSITY_G_PER_ML,
        }
    }
}

impl ConversionContext {
    pub fn new(unit_system: UnitSystem) -> Self {
        ConversionContext {
            unit_system,
            ..Default::default()
        }
    }

    pub fn with_total_flour(mut self, total_flour_g: f64) -> Self {
        self.total_flour_g = Some(total_flour_g);
        self
    }

    pub fn with_fallback_density(mut self, density_g_per_ml: f64) -> Self {
        self.fallback_density_g_per_ml = density_g_per_ml;
        self
    }

    fn flour_total(&self) -> Option<f64> {
        self.total_flour_g.filter(|t| t.is_finite() && *t > 0.0)
    }

    /// Catalog density for an ingredient, or the context fallback
    pub fn density_for(&self, ingredient_id: &str) -> f64 {
        match catalog::density_for(ingredient_id) {
            Some(d) => d,
            None => {
                tracing::debug!(
                    ingredient_id,
                    fallback = self.fallback_density_g_per_ml,
                    "no density on record, using fallback"
                );
                if self.fallback_density_g_per_ml.is_finite() && self.fallback_density_g_per_ml > 0.0 {
                    self.fallback_density_g_per_ml
                } else {
                    WATER_DENSITY_G_PER_ML
                }
            }
        }
    }
}

/// Convert an amount in `unit` to grams.
pub fn to_mass(amount: f64, unit: Unit, ingredient_id: &str, ctx: &ConversionContext) -> f64 {
    if !amount.is_finite() || amount < 0.0 {
        return 0.0;
    }
    if let Some(grams) = unit.to_grams(amount) {
        return grams.0;
    }
    if let Some(ml_per) = unit.ml_per_unit(ctx.unit_system) {
        let density = ctx.density_for(ingredient_id);
        return Milliliters(amount * ml_per).to_grams(density).0;
    }
    match ctx.flour_total() {
        Some(total) => amount / 100.0 * total,
        None => 0.0,
    }
}

/// Convert a mass in grams to an amount in `unit`.
pub fn to_unit(grams: f64, unit: Unit, ingredient_id: &str, ctx: &ConversionContext) -> f64 {
    if !grams.is_finite() || grams < 0.0 {
        return 0.0;
    }
    if let Some(amount) = unit.from_grams(Grams(grams)) {
        return amount;
    }
    if let Some(ml_per) = unit.ml_per_unit(ctx.unit_system) {
        let density = ctx.density_for(ingredient_id);
        return Milliliters::from_grams(Grams(grams), density).0 / ml_per;
    }
    match ctx.flour_total() {
        Some(total) => grams / total * 100.0,
        None => 0.0,
    }
}

/// Convert directly between two display units for the same ingredient.
pub fn convert(amount: f64, from: Unit, to: Unit, ingredient_id: &str, ctx: &ConversionContext) -> f64 {
    to_unit(to_mass(amount, from, ingredient_id, ctx), to, ingredient_id, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        if b == 0.0 {
            a.abs() < 1e-9
        } else {
            ((a - b) / b).abs() < 1e-6
        }
    }

    #[test]
    fn test_kilograms_to_grams() {
        let g: Grams = Kilograms(1.5).into();
        assert_eq!(g.0, 1500.0);
    }

    #[test]
    fn test_pounds_and_ounces() {
        let g: Grams = Pounds(1.0).into();
        assert_eq!(g.0, 453.59237);
        let oz: Ounces = Grams(GRAMS_PER_OUNCE * 16.0).into();
        assert!(close(oz.0, 16.0));
    }

    #[test]
    fn test_mass_units_convert_through_grams() {
        let ctx = ConversionContext::default();
        assert_eq!(to_mass(1.5, Unit::Kilograms, "flour", &ctx), 1500.0);
        assert_eq!(to_mass(1.0, Unit::Pound, "flour", &ctx), GRAMS_PER_POUND);
        assert!(close(to_unit(453.59237, Unit::Ounce, "flour", &ctx), 16.0));
        assert!(close(convert(2.0, Unit::Pound, Unit::Kilograms, "flour", &ctx), 0.90718474));
    }

    #[test]
    fn test_volume_units() {
        assert!(Unit::Cup.is_volume());
        assert!(Unit::Liters.is_volume());
        assert!(!Unit::Ounce.is_volume());
        assert!(!Unit::Percent.is_volume());
    }

    #[test]
    fn test_unit_serialization() {
        assert_eq!(serde_json::to_string(&Unit::Percent).unwrap(), "\"%\"");
        assert_eq!(serde_json::to_string(&Unit::Tablespoon).unwrap(), "\"tbsp\"");
        let unit: Unit = serde_json::from_str("\"lb\"").unwrap();
        assert_eq!(unit, Unit::Pound);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("Grams".parse::<Unit>().unwrap(), Unit::Grams);
        assert_eq!("cups".parse::<Unit>().unwrap(), Unit::Cup);
        assert_eq!("%".parse::<Unit>().unwrap(), Unit::Percent);
        assert!("pint".parse::<Unit>().is_err());
    }

    #[test]
    fn test_percent_uses_total_flour() {
        let ctx = ConversionContext::default().with_total_flour(1000.0);
        assert_eq!(to_mass(2.5, Unit::Percent, "salt", &ctx), 25.0);
        assert_eq!(to_unit(25.0, Unit::Percent, "salt", &ctx), 2.5);
    }

    #[test]
    fn test_percent_without_flour_total_falls_back_to_zero() {
        let ctx = ConversionContext::default();
        assert_eq!(to_mass(65.0, Unit::Percent, "water", &ctx), 0.0);
        assert_eq!(to_unit(100.0, Unit::Percent, "water", &ctx), 0.0);

        let zero = ConversionContext::default().with_total_flour(0.0);
        assert_eq!(to_unit(100.0, Unit::Percent, "water", &zero), 0.0);
    }

    #[test]
    fn test_invalid_amounts_fall_back_to_zero() {
        let ctx = ConversionContext::default();
        assert_eq!(to_mass(-1.0, Unit::Grams, "water", &ctx), 0.0);
        assert_eq!(to_mass(f64::NAN, Unit::Cup, "water", &ctx), 0.0);
        assert_eq!(to_unit(f64::INFINITY, Unit::Ounce, "water", &ctx), 0.0);
    }

    #[test]
    fn test_volume_uses_density() {
        let ctx = ConversionContext::new(UnitSystem::Metric);
        assert_eq!(to_mass(1.0, Unit::Liters, "water", &ctx), 1000.0);
        assert!(close(to_mass(1.0, Unit::Cup, "honey", &ctx), 355.0));
    }

    #[test]
    fn test_unit_system_changes_cup_size() {
        let metric = ConversionContext::new(UnitSystem::Metric);
        let us = ConversionContext::new(UnitSystem::UsCustomary);
        assert_eq!(to_mass(1.0, Unit::Cup, "water", &metric), 250.0);
        assert!(close(to_mass(1.0, Unit::Cup, "water", &us), 236.5882365));
    }

    #[test]
    fn test_unknown_ingredient_is_water_dense() {
        let ctx = ConversionContext::default();
        assert_eq!(to_mass(100.0, Unit::Milliliters, "mystery_syrup", &ctx), 100.0);

        let heavier = ctx.with_fallback_density(0.6);
        assert!(close(to_mass(100.0, Unit::Milliliters, "mystery_syrup", &heavier), 60.0));
    }

    #[test]
    fn test_bad_fallback_density_uses_water() {
        let ctx = ConversionContext::default().with_fallback_density(0.0);
        assert_eq!(ctx.density_for("mystery_syrup"), WATER_DENSITY_G_PER_ML);
    }

    #[test]
    fn test_round_trip_every_unit() {
        let ids = ["water", "salt", "olive_oil", "honey", "tipo_00", "mystery_syrup"];
        for system in [UnitSystem::Metric, UnitSystem::UsCustomary] {
            let ctx = ConversionContext::new(system).with_total_flour(595.6);
            for unit in Unit::ALL {
                for id in ids {
                    let x = 37.25;
                    let back = to_unit(to_mass(x, unit, id, &ctx), unit, id, &ctx);
                    assert!(close(back, x), "{unit} {id}: {back} != {x}");
                }
            }
        }
    }

    #[test]
    fn test_convert_between_units() {
        let ctx = ConversionContext::default();
        assert!(close(convert(1.0, Unit::Pound, Unit::Ounce, "salt", &ctx), 16.0));
        assert!(close(convert(1.0, Unit::Tablespoon, Unit::Teaspoon, "salt", &ctx), 3.0));
    }
}
