//! `dough preset` -- save, load, list and delete named presets.

use anyhow::{Context, Result};
use dough_core::errors::FormulaError;
use dough_core::preset::PresetStore;
use serde_json::json;

use crate::cli::PresetCommand;
use crate::commands::read_recipe;
use crate::context::RuntimeContext;
use crate::output::output_json;

pub fn run(ctx: &RuntimeContext, cmd: &PresetCommand) -> Result<()> {
    let mut store = ctx.preset_store();

    match cmd {
        PresetCommand::Save { name, recipe } => {
            let config = read_recipe(recipe)?;
            config.validate()?;
            store
                .save(name, &config)
                .with_context(|| format!("saving preset '{}'", name))?;
            if ctx.json {
                output_json(&json!({ "saved": name, "path": store.path() }));
            } else {
                println!("Saved preset '{}' to {}", name, store.path().display());
            }
        }
        PresetCommand::Load { name } => {
            let config = store.load(name)?.ok_or_else(|| FormulaError::preset_not_found(name.as_str()))?;
            output_json(&config);
        }
        PresetCommand::List => {
            let names = store.list()?;
            if ctx.json {
                output_json(&names);
            } else if names.is_empty() {
                println!("No presets in {}", store.path().display());
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        PresetCommand::Delete { name } => {
            if !store.delete(name)? {
                return Err(FormulaError::preset_not_found(name.as_str()).into());
            }
            if ctx.json {
                output_json(&json!({ "deleted": name }));
            } else {
                println!("Deleted preset '{}'", name);
            }
        }
    }
    Ok(())
}
