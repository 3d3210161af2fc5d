//! # Dough Calculations
//!
//! The three pure stages a recipe edit runs through, in order:
//!
//! - [`blend`] - rebalance the flour blend so it sums to 100%
//! - [`characteristics`] - estimate strength and protein of the blend
//! - [`formulation`] - turn the config into gram amounts
//!
//! Each stage is a pure function of its input. A caller editing a recipe
//! should run them in that order for a single edit so an unbalanced blend is
//! never shown as final; [`formulation::analyze`] does exactly that.

pub mod blend;
pub mod characteristics;
pub mod formulation;

// Re-export commonly used types
pub use blend::{balance, is_balanced, FLOUR_SUM_TOLERANCE, MAX_SECONDARY_FLOUR_PCT};
pub use characteristics::{estimate, BlendResult};
pub use formulation::{
    analyze, calculate, formulate, DoughResult, FinalDoughAmounts, IngredientAmount,
    PrefermentAmounts, RecipeAnalysis,
};
