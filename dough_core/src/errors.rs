//! # Error Types
//!
//! Structured error types for dough_core. The formulation engine itself never
//! fails; these errors come from the validation boundary in front of it, from
//! string-keyed catalog lookups, and from preset storage.
//!
//! ## Example
//!
//! ```rust
//! use dough_core::errors::{FormulaError, FormulaResult};
//!
//! fn validate_hydration(hydration: f64) -> FormulaResult<()> {
//!     if hydration < 0.0 {
//!         return Err(FormulaError::InvalidInput {
//!             field: "hydration".to_string(),
//!             value: hydration.to_string(),
//!             reason: "Hydration cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for dough_core operations
pub type FormulaResult<T> = Result<T, FormulaError>;

/// Structured error type for recipe operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum FormulaError {
    /// An input value is invalid (negative, non-finite, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Ingredient id not present in the recipe
    #[error("Ingredient not found: {ingredient_id}")]
    IngredientNotFound { ingredient_id: String },

    /// Ingredient id already present in the recipe
    #[error("Duplicate ingredient: {ingredient_id}")]
    DuplicateIngredient { ingredient_id: String },

    /// The main flour cannot be removed or demoted
    #[error("Main flour '{flour_id}' cannot be removed")]
    MainFlourRequired { flour_id: String },

    /// Unit symbol not recognised
    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },

    /// Preset not found in the store
    #[error("Preset not found: {name}")]
    PresetNotFound { name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl FormulaError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        FormulaError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        FormulaError::MissingField {
            field: field.into(),
        }
    }

    /// Create an IngredientNotFound error
    pub fn ingredient_not_found(ingredient_id: impl Into<String>) -> Self {
        FormulaError::IngredientNotFound {
            ingredient_id: ingredient_id.into(),
        }
    }

    /// Create a DuplicateIngredient error
    pub fn duplicate_ingredient(ingredient_id: impl Into<String>) -> Self {
        FormulaError::DuplicateIngredient {
            ingredient_id: ingredient_id.into(),
        }
    }

    /// Create a MainFlourRequired error
    pub fn main_flour_required(flour_id: impl Into<String>) -> Self {
        FormulaError::MainFlourRequired {
            flour_id: flour_id.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(unit: impl Into<String>) -> Self {
        FormulaError::UnknownUnit { unit: unit.into() }
    }

    /// Create a PresetNotFound error
    pub fn preset_not_found(name: impl Into<String>) -> Self {
        FormulaError::PresetNotFound { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        FormulaError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        FormulaError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        FormulaError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FormulaError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FormulaError::InvalidInput { .. } => "INVALID_INPUT",
            FormulaError::MissingField { .. } => "MISSING_FIELD",
            FormulaError::IngredientNotFound { .. } => "INGREDIENT_NOT_FOUND",
            FormulaError::DuplicateIngredient { .. } => "DUPLICATE_INGREDIENT",
            FormulaError::MainFlourRequired { .. } => "MAIN_FLOUR_REQUIRED",
            FormulaError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            FormulaError::PresetNotFound { .. } => "PRESET_NOT_FOUND",
            FormulaError::FileError { .. } => "FILE_ERROR",
            FormulaError::FileLocked { .. } => "FILE_LOCKED",
            FormulaError::SerializationError { .. } => "SERIALIZATION_ERROR",
            FormulaError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = FormulaError::invalid_input("hydration", "-5", "Hydration cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: FormulaError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FormulaError::missing_field("flour_id").error_code(), "MISSING_FIELD");
        assert_eq!(FormulaError::main_flour_required("tipo_00").error_code(), "MAIN_FLOUR_REQUIRED");
        assert_eq!(FormulaError::unknown_unit("pint").error_code(), "UNKNOWN_UNIT");
    }

    #[test]
    fn test_only_lock_errors_are_recoverable() {
        assert!(FormulaError::file_locked("a.dough", "someone", "now").is_recoverable());
        assert!(!FormulaError::preset_not_found("margherita").is_recoverable());
    }
}
