//! Runtime context shared by command handlers.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dough_core::file_io::{FilePresetStore, LIBRARY_EXTENSION};
use dough_core::settings::{load_settings, Settings};

use crate::cli::GlobalArgs;

#[derive(Debug)]
pub struct RuntimeContext {
    pub settings: Settings,
    /// Resolved preset library file
    pub presets_path: PathBuf,
    /// Name written into preset lock files
    pub user: String,
    pub json: bool,
    pub verbose: bool,
}

impl RuntimeContext {
    /// Resolve settings and the preset library path from global flags.
    ///
    /// Preset path priority: `--presets` > settings `presets_path` >
    /// `presets.dough` in the working directory.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let settings = match &global.settings {
            Some(path) => load_settings(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let presets_path = global
            .presets
            .clone()
            .or_else(|| settings.presets_path.clone())
            .unwrap_or_else(|| PathBuf::from(format!("presets.{}", LIBRARY_EXTENSION)));

        Ok(Self {
            settings,
            presets_path,
            user: resolve_user(),
            json: global.json,
            verbose: global.verbose,
        })
    }

    pub fn preset_store(&self) -> FilePresetStore {
        FilePresetStore::new(&self.presets_path, self.user.as_str())
    }
}

fn resolve_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
