//! # Presets
//!
//! Named, storable snapshots of a [`DoughConfig`]. A [`PresetLibrary`] holds
//! many presets and serializes to a `.dough` JSON file (see
//! [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! PresetLibrary
//! ├── version: schema version
//! ├── modified: last change
//! └── presets: HashMap<Uuid, Preset>
//!     └── Preset
//!         ├── meta: PresetMetadata (name, timestamps)
//!         ├── config: DoughConfig   (source of truth)
//!         └── snapshot: DoughResult (cached, recomputed on save)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use dough_core::preset::{MemoryPresetStore, PresetStore};
//! use dough_core::recipe::DoughConfig;
//!
//! let mut store = MemoryPresetStore::new();
//! store.save("Neapolitan", &DoughConfig::new("tipo_00_pizzeria")).unwrap();
//!
//! assert_eq!(store.list().unwrap(), vec!["Neapolitan".to_string()]);
//! assert!(store.load("Neapolitan").unwrap().is_some());
//! assert!(store.delete("Neapolitan").unwrap());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::formulation::{calculate, DoughResult};
use crate::errors::{FormulaError, FormulaResult};
use crate::recipe::DoughConfig;

/// Current schema version for .dough files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Key/value store of named recipe configurations.
///
/// Names are unique; saving under an existing name replaces that preset.
pub trait PresetStore {
    /// Save `config` under `name`, replacing any preset with that name.
    fn save(&mut self, name: &str, config: &DoughConfig) -> FormulaResult<()>;

    /// Load the config saved under `name`.
    fn load(&self, name: &str) -> FormulaResult<Option<DoughConfig>>;

    /// All preset names, sorted.
    fn list(&self) -> FormulaResult<Vec<String>>;

    /// Delete the preset named `name`. Returns whether it existed.
    fn delete(&mut self, name: &str) -> FormulaResult<bool>;
}

/// Preset metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// A named recipe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub meta: PresetMetadata,
    pub config: DoughConfig,
    /// Amounts computed when the preset was saved; not authoritative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<DoughResult>,
}

impl Preset {
    pub fn new(name: impl Into<String>, config: DoughConfig) -> Self {
        let now = Utc::now();
        let snapshot = calculate(&config).ok();
        Preset {
            id: Uuid::new_v4(),
            meta: PresetMetadata {
                name: name.into(),
                created: now,
                modified: now,
            },
            config,
            snapshot,
        }
    }

    /// Replace the config and refresh the cached snapshot.
    pub fn update(&mut self, config: DoughConfig) {
        self.snapshot = calculate(&config).ok();
        self.config = config;
        self.meta.modified = Utc::now();
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

/// A collection of presets, keyed by UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetLibrary {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub modified: DateTime<Utc>,
    pub presets: HashMap<Uuid, Preset>,
}

impl Default for PresetLibrary {
    fn default() -> Self {
        PresetLibrary::new()
    }
}

impl PresetLibrary {
    pub fn new() -> Self {
        PresetLibrary {
            version: SCHEMA_VERSION.to_string(),
            modified: Utc::now(),
            presets: HashMap::new(),
        }
    }

    /// Find a preset by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Preset> {
        self.presets.values().find(|p| p.meta.name == name)
    }

    fn id_for_name(&self, name: &str) -> Option<Uuid> {
        self.find_by_name(name).map(|p| p.id)
    }

    /// Insert or replace the preset named `name`.
    ///
    /// Returns the preset's UUID, which is kept across replacements.
    pub fn upsert(&mut self, name: &str, config: DoughConfig) -> FormulaResult<Uuid> {
        let name = validate_name(name)?;
        let id = match self.id_for_name(name).and_then(|id| self.presets.get_mut(&id)) {
            Some(existing) => {
                existing.update(config);
                existing.id
            }
            None => {
                let preset = Preset::new(name, config);
                let id = preset.id;
                self.presets.insert(id, preset);
                id
            }
        };
        self.touch();
        Ok(id)
    }

    /// Remove the preset named `name`.
    pub fn remove_by_name(&mut self, name: &str) -> Option<Preset> {
        let id = self.id_for_name(name)?;
        let removed = self.presets.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// All preset names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.presets.values().map(|p| p.meta.name.clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

fn validate_name(name: &str) -> FormulaResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FormulaError::invalid_input("name", name, "Preset name cannot be empty"));
    }
    Ok(trimmed)
}

/// In-memory preset store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPresetStore {
    library: PresetLibrary,
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library(&self) -> &PresetLibrary {
        &self.library
    }
}

impl PresetStore for MemoryPresetStore {
    fn save(&mut self, name: &str, config: &DoughConfig) -> FormulaResult<()> {
        self.library.upsert(name, config.clone()).map(|_| ())
    }

    fn load(&self, name: &str) -> FormulaResult<Option<DoughConfig>> {
        Ok(self.library.find_by_name(name.trim()).map(|p| p.config.clone()))
    }

    fn list(&self) -> FormulaResult<Vec<String>> {
        Ok(self.library.names())
    }

    fn delete(&mut self, name: &str) -> FormulaResult<bool> {
        Ok(self.library.remove_by_name(name.trim()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::FermentationTechnique;

    #[test]
    fn test_preset_has_snapshot() {
        let preset = Preset::new("Basic", DoughConfig::default());
        let snapshot = preset.snapshot.unwrap();
        assert!((snapshot.total_dough - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_has_no_snapshot() {
        let mut config = DoughConfig::default();
        config.hydration = -1.0;
        let preset = Preset::new("Broken", config);
        assert!(preset.snapshot.is_none());
    }

    #[test]
    fn test_upsert_replaces_by_name() {
        let mut library = PresetLibrary::new();
        let first = library.upsert("Weeknight", DoughConfig::default()).unwrap();

        let mut config = DoughConfig::default();
        config.fermentation_technique = FermentationTechnique::Poolish;
        config.preferment_flour_percentage = 25.0;
        let second = library.upsert("Weeknight", config.clone()).unwrap();

        assert_eq!(first, second);
        assert_eq!(library.len(), 1);
        let preset = library.find_by_name("Weeknight").unwrap();
        assert_eq!(preset.config, config);
        assert!(preset.snapshot.as_ref().unwrap().preferment.is_some());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut library = PresetLibrary::new();
        assert!(library.upsert("   ", DoughConfig::default()).is_err());
    }

    #[test]
    fn test_memory_store_contract() {
        let mut store = MemoryPresetStore::new();
        store.save("b", &DoughConfig::default()).unwrap();
        store.save("a", &DoughConfig::new("manitoba")).unwrap();

        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
        assert_eq!(store.load("a").unwrap().unwrap().flour_id, "manitoba");
        assert!(store.load("zzz").unwrap().is_none());

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.list().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_library_serialization() {
        let mut library = PresetLibrary::new();
        library.upsert("Neapolitan", DoughConfig::default()).unwrap();
        let json = serde_json::to_string_pretty(&library).unwrap();
        assert!(json.contains("Neapolitan"));
        assert!(json.contains(SCHEMA_VERSION));

        let roundtrip: PresetLibrary = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.names(), vec!["Neapolitan"]);
    }
}
