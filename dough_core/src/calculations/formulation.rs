//! # Recipe Formulation Engine
//!
//! Turns a [`DoughConfig`] into gram amounts for every ingredient, split into
//! preferment and final-dough sub-recipes when a poolish or biga is used.
//!
//! ## Method
//!
//! Every ingredient is a percentage of total flour, so
//!
//! ```text
//! total_dough = total_flour × (1 + Σ non-flour % / 100)
//! ```
//!
//! When sizing by mass this is inverted to find total flour. Each ingredient
//! is then `pct / 100 × total_flour`.
//!
//! ## Preferment
//!
//! - flour: `total_flour × preferment_flour_percentage / 100`
//! - yeast: same share of the total yeast
//! - water: preferment flour at the preferment hydration (poolish 100%,
//!   biga 55%, or the config override), capped at the total water
//! - salt, oil, sugar and extras all go in the final dough
//!
//! Sourdough yeast types are always formulated as direct doughs.
//!
//! ## Example
//!
//! ```rust
//! use dough_core::calculations::formulation::calculate;
//! use dough_core::recipe::{DoughConfig, FermentationTechnique};
//!
//! let mut config = DoughConfig::new("tipo_00_pizzeria");
//! config.hydration = 65.0;
//! config.salt = 3.0;
//! config.yeast_percentage = 0.2;
//! config.fermentation_technique = FermentationTechnique::Poolish;
//! config.preferment_flour_percentage = 30.0;
//!
//! let result = calculate(&config).unwrap();
//! assert!((result.total_dough - 1000.0).abs() < 1e-9);
//!
//! let poolish = result.preferment.unwrap();
//! let final_dough = result.final_dough.unwrap();
//! assert!((poolish.flour + final_dough.flour - result.total_flour).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::blend::balance;
use crate::calculations::characteristics::{estimate, BlendResult};
use crate::errors::FormulaResult;
use crate::recipe::{DoughConfig, FermentationTechnique, IngredientSet, Sizing};

/// Gram amount of one ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: String,
    pub name: String,
    pub grams: f64,
}

/// The preferment sub-recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrefermentAmounts {
    pub flour: f64,
    pub water: f64,
    pub yeast: f64,
}

impl PrefermentAmounts {
    pub fn total(&self) -> f64 {
        self.flour + self.water + self.yeast
    }
}

/// What is mixed into the preferment to make the final dough
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalDoughAmounts {
    pub flour: f64,
    pub water: f64,
    pub salt: f64,
    pub oil: f64,
    pub sugar: f64,
    pub yeast: f64,
    /// All extra ingredients together
    pub extras: f64,
}

impl FinalDoughAmounts {
    pub fn total(&self) -> f64 {
        self.flour + self.water + self.salt + self.oil + self.sugar + self.yeast + self.extras
    }
}

/// Computed gram amounts for a batch.
///
/// Amounts are unrounded; use [`DoughResult::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoughResult {
    pub total_dough: f64,
    pub total_flour: f64,
    pub total_water: f64,
    pub total_salt: f64,
    pub total_oil: f64,
    pub total_sugar: f64,
    pub total_yeast: f64,
    pub total_extras: f64,
    /// Per-flour breakdown of `total_flour`
    pub flours: Vec<IngredientAmount>,
    /// Per-line breakdown of `total_extras`
    pub extras: Vec<IngredientAmount>,
    /// Technique the amounts were computed for
    pub technique: FermentationTechnique,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferment: Option<PrefermentAmounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_dough: Option<FinalDoughAmounts>,
}

impl DoughResult {
    /// Water as a percentage of flour actually delivered
    pub fn effective_hydration(&self) -> f64 {
        if self.total_flour > 0.0 {
            self.total_water / self.total_flour * 100.0
        } else {
            0.0
        }
    }

    /// Difference between `total_dough` and the sum of its ingredients
    pub fn mass_balance_error(&self) -> f64 {
        let parts = self.total_flour
            + self.total_water
            + self.total_salt
            + self.total_oil
            + self.total_sugar
            + self.total_yeast
            + self.total_extras;
        (self.total_dough - parts).abs()
    }

    /// Copy with every gram amount rounded to 0.1 g for display
    pub fn rounded(&self) -> DoughResult {
        let r = |g: f64| (g * 10.0).round() / 10.0;
        let lines = |items: &[IngredientAmount]| -> Vec<IngredientAmount> {
            items
                .iter()
                .map(|i| IngredientAmount {
                    grams: r(i.grams),
                    ..i.clone()
                })
                .collect()
        };
        DoughResult {
            total_dough: r(self.total_dough),
            total_flour: r(self.total_flour),
            total_water: r(self.total_water),
            total_salt: r(self.total_salt),
            total_oil: r(self.total_oil),
            total_sugar: r(self.total_sugar),
            total_yeast: r(self.total_yeast),
            total_extras: r(self.total_extras),
            flours: lines(&self.flours),
            extras: lines(&self.extras),
            technique: self.technique,
            preferment: self.preferment.map(|p| PrefermentAmounts {
                flour: r(p.flour),
                water: r(p.water),
                yeast: r(p.yeast),
            }),
            final_dough: self.final_dough.map(|f| FinalDoughAmounts {
                flour: r(f.flour),
                water: r(f.water),
                salt: r(f.salt),
                oil: r(f.oil),
                sugar: r(f.sugar),
                yeast: r(f.yeast),
                extras: r(f.extras),
            }),
        }
    }
}

/// Blend estimate and batch amounts computed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeAnalysis {
    pub blend: BlendResult,
    pub dough: DoughResult,
    /// Whether the recipe hydration falls inside the blend's hydration window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration_in_range: Option<bool>,
}

/// Clamp a percentage to a usable non-negative finite value
fn sanitize(pct: f64) -> f64 {
    if pct.is_finite() && pct > 0.0 {
        pct
    } else {
        0.0
    }
}

/// Compute gram amounts for `config` using an already balanced flour blend.
///
/// Pure and infallible: invalid numbers are expected to be caught by
/// [`DoughConfig::validate`] first, and anything that slips through is
/// treated as zero so the result stays finite and non-negative.
pub fn formulate(config: &DoughConfig, ingredients: &IngredientSet) -> DoughResult {
    debug_assert!(
        ingredients.get(&config.flour_id).is_some_and(|f| f.is_flour()),
        "main flour '{}' missing from blend",
        config.flour_id
    );

    let hydration = sanitize(config.hydration);
    let salt = sanitize(config.salt);
    let oil = sanitize(config.oil);
    let sugar = sanitize(config.sugar);
    let yeast = sanitize(config.yeast_percentage);
    let extras_pct: f64 = ingredients.extras().map(|e| sanitize(e.baker_percentage)).sum();
    let non_flour_pct = hydration + salt + oil + sugar + yeast + extras_pct;

    // Step 1: total flour
    let total_flour = match config.sizing {
        Sizing::ByFlour { total_flour_g } => sanitize(total_flour_g),
        Sizing::ByMass { .. } => {
            let target = sanitize(config.sizing.target_dough_g().unwrap_or(0.0));
            target / (1.0 + non_flour_pct / 100.0)
        }
    };
    let grams = |pct: f64| pct / 100.0 * total_flour;

    // Step 2: each ingredient
    let total_water = grams(hydration);
    let total_salt = grams(salt);
    let total_oil = grams(oil);
    let total_sugar = grams(sugar);
    let total_yeast = grams(yeast);

    let flour_pct_sum: f64 = ingredients.flours().map(|f| sanitize(f.baker_percentage)).sum();
    let flours: Vec<IngredientAmount> = ingredients
        .flours()
        .map(|f| IngredientAmount {
            id: f.id.clone(),
            name: f.name.clone(),
            grams: if flour_pct_sum > 0.0 {
                sanitize(f.baker_percentage) / flour_pct_sum * total_flour
            } else {
                0.0
            },
        })
        .collect();

    let extras: Vec<IngredientAmount> = ingredients
        .extras()
        .map(|e| IngredientAmount {
            id: e.id.clone(),
            name: e.name.clone(),
            grams: grams(sanitize(e.baker_percentage)),
        })
        .collect();
    let total_extras = extras.iter().map(|e| e.grams).fold(0.0, |acc, g| acc + g);

    // Step 3: preferment split
    let technique = config.effective_technique();
    let (preferment, final_dough) = match config.effective_preferment_hydration() {
        Some(pf_hydration) => {
            let share = sanitize(config.preferment_flour_percentage).min(100.0) / 100.0;
            let pf_flour = total_flour * share;
            let pf_yeast = total_yeast * share;
            let pf_water = (pf_flour * sanitize(pf_hydration) / 100.0).min(total_water);
            let preferment = PrefermentAmounts {
                flour: pf_flour,
                water: pf_water,
                yeast: pf_yeast,
            };
            let final_dough = FinalDoughAmounts {
                flour: total_flour - pf_flour,
                water: total_water - pf_water,
                salt: total_salt,
                oil: total_oil,
                sugar: total_sugar,
                yeast: total_yeast - pf_yeast,
                extras: total_extras,
            };
            tracing::trace!(%technique, pf_flour, pf_water, "preferment split");
            (Some(preferment), Some(final_dough))
        }
        None => (None, None),
    };

    // Step 4: assemble
    DoughResult {
        total_dough: total_flour + total_water + total_salt + total_oil + total_sugar + total_yeast + total_extras,
        total_flour,
        total_water,
        total_salt,
        total_oil,
        total_sugar,
        total_yeast,
        total_extras,
        flours,
        extras,
        technique,
        preferment,
        final_dough,
    }
}

/// Validate, balance and formulate in one call.
///
/// # Returns
///
/// * `Ok(DoughResult)` - gram amounts for the batch
/// * `Err(FormulaError)` - the config failed validation
pub fn calculate(config: &DoughConfig) -> FormulaResult<DoughResult> {
    config.validate()?;
    let balanced = balance(&config.ingredients, &config.flour_id);
    Ok(formulate(config, &balanced))
}

/// Balance, estimate and formulate in order, so the blend estimate and the
/// amounts always come from the same balanced blend.
pub fn analyze(config: &DoughConfig) -> FormulaResult<RecipeAnalysis> {
    config.validate()?;
    let balanced = balance(&config.ingredients, &config.flour_id);
    let blend = estimate(&balanced);
    let dough = formulate(config, &balanced);
    let hydration_in_range = blend.hydration_hint.map(|hint| hint.contains(config.hydration));
    tracing::debug!(
        total_dough = dough.total_dough,
        total_flour = dough.total_flour,
        blend = %blend.composite_name,
        "recipe analyzed"
    );
    Ok(RecipeAnalysis {
        blend,
        dough,
        hydration_in_range,
    })
}
