//! # dough_core - Dough Formulation Engine
//!
//! `dough_core` turns a baker's-percentage recipe into gram amounts. All
//! inputs and outputs are JSON-serializable so the same engine serves the
//! CLI, a UI, or any scripted caller.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: calculations are pure functions of the recipe
//! - **JSON-First**: every recipe and result type implements Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Flour is 100%**: every other ingredient is a percentage of total flour
//!
//! ## Quick Start
//!
//! ```rust
//! use dough_core::{calculate, DoughConfig};
//!
//! let mut config = DoughConfig::new("tipo_00_pizzeria");
//! config.hydration = 63.0;
//! config.add_catalog_flour("whole_wheat", 10.0).unwrap();
//!
//! let result = calculate(&config).unwrap();
//! assert!((result.total_dough - 1000.0).abs() < 1e-9);
//! assert!((result.total_water / result.total_flour - 0.63).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`recipe`] - Recipe configuration and ingredient set
//! - [`calculations`] - Blend balancing, blend estimation and formulation
//! - [`catalog`] - Static flour and additive databases
//! - [`units`] - Unit conversion between %, mass and volume
//! - [`preset`] - Named presets and the preset store trait
//! - [`file_io`] - File-backed preset library with atomic saves and locking
//! - [`settings`] - TOML user settings
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod file_io;
pub mod preset;
pub mod recipe;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{analyze, calculate, BlendResult, DoughResult, RecipeAnalysis};
pub use errors::{FormulaError, FormulaResult};
pub use file_io::{FileLock, FilePresetStore};
pub use preset::{MemoryPresetStore, Preset, PresetLibrary, PresetStore};
pub use recipe::{DoughConfig, FermentationTechnique, IngredientConfig, Sizing, YeastType};
pub use settings::Settings;
pub use units::{ConversionContext, Unit, UnitSystem};
