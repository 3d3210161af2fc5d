//! Command handlers, one module per subcommand.

pub mod blend;
pub mod convert;
pub mod flours;
pub mod formulate;
pub mod preset;
pub mod template;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dough_core::DoughConfig;

/// Read and parse a recipe JSON file.
pub fn read_recipe(path: &Path) -> Result<DoughConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: DoughConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing recipe {}", path.display()))?;
    tracing::debug!(path = %path.display(), flour = %config.flour_id, "recipe loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_recipe_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        let config = DoughConfig::new("manitoba");
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(read_recipe(&path).unwrap(), config);
    }

    #[test]
    fn read_recipe_reports_path() {
        let err = read_recipe(Path::new("/nonexistent/recipe.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/recipe.json"));
    }
}
