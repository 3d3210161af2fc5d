//! # Settings
//!
//! User-level settings loaded from a TOML file. Every field has a default, so
//! an empty or partial file is valid.
//!
//! ```toml
//! unit_system = "us_customary"
//! fallback_density_g_per_ml = 1.0
//! presets_path = "/home/me/.local/share/levain/presets.dough"
//!
//! [defaults]
//! flour_id = "tipo_00_pizzeria"
//! hydration = 62.0
//! num_pizzas = 6
//! dough_ball_weight_g = 270.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{FormulaError, FormulaResult};
use crate::recipe::{DoughConfig, FermentationTechnique, Sizing, YeastType};
use crate::units::{ConversionContext, UnitSystem, WATER_DENSITY_G_PER_ML};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cup/spoon sizes used for volume conversion
    pub unit_system: UnitSystem,
    /// Density assumed for ingredients with no catalog density (g/ml)
    pub fallback_density_g_per_ml: f64,
    /// Preset library file; `None` means the caller picks a location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presets_path: Option<PathBuf>,
    /// Template for new recipes
    pub defaults: RecipeDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            unit_system: UnitSystem::Metric,
            fallback_density_g_per_ml: WATER_DENSITY_G_PER_ML,
            presets_path: None,
            defaults: RecipeDefaults::default(),
        }
    }
}

/// Starting values for a new recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeDefaults {
    pub flour_id: String,
    pub hydration: f64,
    pub salt: f64,
    pub oil: f64,
    pub sugar: f64,
    pub yeast_type: YeastType,
    pub yeast_percentage: f64,
    pub fermentation_technique: FermentationTechnique,
    pub preferment_flour_percentage: f64,
    pub num_pizzas: u32,
    pub dough_ball_weight_g: f64,
}

impl Default for RecipeDefaults {
    fn default() -> Self {
        RecipeDefaults {
            flour_id: "tipo_00_pizzeria".to_string(),
            hydration: 65.0,
            salt: 2.5,
            oil: 0.0,
            sugar: 0.0,
            yeast_type: YeastType::Instant,
            yeast_percentage: 0.2,
            fermentation_technique: FermentationTechnique::Direct,
            preferment_flour_percentage: 0.0,
            num_pizzas: 4,
            dough_ball_weight_g: 250.0,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> FormulaResult<Self> {
        toml::from_str(text).map_err(|e| FormulaError::serialization(format!("Invalid settings: {}", e)))
    }

    /// Serialize settings as TOML
    pub fn to_toml_string(&self) -> FormulaResult<String> {
        toml::to_string_pretty(self).map_err(|e| FormulaError::serialization(e.to_string()))
    }

    /// Conversion context for these settings; the caller adds the flour total
    pub fn conversion_context(&self) -> ConversionContext {
        ConversionContext::new(self.unit_system).with_fallback_density(self.fallback_density_g_per_ml)
    }

    /// A new recipe built from the `defaults` section
    pub fn default_config(&self) -> DoughConfig {
        let d = &self.defaults;
        let mut config = DoughConfig::new(&d.flour_id);
        config.hydration = d.hydration;
        config.salt = d.salt;
        config.oil = d.oil;
        config.sugar = d.sugar;
        config.yeast_type = d.yeast_type;
        config.yeast_percentage = d.yeast_percentage;
        config.fermentation_technique = d.fermentation_technique;
        config.preferment_flour_percentage = d.preferment_flour_percentage;
        config.sizing = Sizing::ByMass {
            num_pizzas: d.num_pizzas,
            dough_ball_weight_g: d.dough_ball_weight_g,
        };
        config
    }
}

/// Load settings from a TOML file.
///
/// A missing file yields the defaults; an unreadable or malformed one is an
/// error.
pub fn load_settings(path: &Path) -> FormulaResult<Settings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(path)
        .map_err(|e| FormulaError::file_error("read settings", path.display().to_string(), e.to_string()))?;
    let settings = Settings::from_toml_str(&text)?;
    tracing::debug!(path = %path.display(), "settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_toml() {
        let text = r#"
            unit_system = "us_customary"

            [defaults]
            hydration = 70.0
            fermentation_technique = "biga"
            preferment_flour_percentage = 50.0
        "#;
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.unit_system, UnitSystem::UsCustomary);
        assert_eq!(settings.defaults.hydration, 70.0);
        assert_eq!(settings.defaults.salt, 2.5);

        let config = settings.default_config();
        assert_eq!(config.fermentation_technique, FermentationTechnique::Biga);
        assert_eq!(config.preferment_flour_percentage, 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Settings::from_toml_str("unit_system = 42").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut settings = Settings::default();
        settings.fallback_density_g_per_ml = 0.6;
        let text = settings.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "fallback_density_g_per_ml = 0.6\n").unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.fallback_density_g_per_ml, 0.6);
        assert_eq!(settings.conversion_context().fallback_density_g_per_ml, 0.6);
    }
}
