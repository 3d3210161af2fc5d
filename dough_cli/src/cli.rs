//! Clap CLI definitions for the `dough` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// dough -- pizza and bread dough calculator.
///
/// Recipes are expressed in baker's percentages (flour = 100%) and turned
/// into gram amounts for a batch.
#[derive(Parser, Debug)]
#[command(name = "dough", about = "Baker's-percentage dough calculator", version, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags available to every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Settings file (TOML). Missing file means built-in defaults.
    #[arg(long, global = true, env = "DOUGH_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Preset library file (overrides `presets_path` in settings).
    #[arg(long, global = true, env = "DOUGH_PRESETS")]
    pub presets: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute gram amounts for a recipe file.
    #[command(alias = "calc")]
    Formulate(RecipeArgs),

    /// Show the balanced flour blend and its estimated strength.
    Blend(RecipeArgs),

    /// Convert an ingredient amount between units.
    Convert(ConvertArgs),

    /// List the flour catalog.
    Flours,

    /// Print a starter recipe built from the settings defaults.
    Template,

    /// Manage saved presets.
    #[command(subcommand)]
    Preset(PresetCommand),
}

#[derive(Args, Debug)]
pub struct RecipeArgs {
    /// Recipe JSON file
    pub recipe: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Amount to convert
    #[arg(allow_negative_numbers = true)]
    pub amount: f64,

    /// Source unit (%, g, kg, ml, l, cup, tbsp, tsp, oz, lb)
    pub from: String,

    /// Target unit
    pub to: String,

    /// Ingredient id, used to look up its density
    #[arg(long, default_value = "water")]
    pub ingredient: String,

    /// Total flour weight in grams, needed for % conversions
    #[arg(long)]
    pub total_flour: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// Save a recipe file as a named preset.
    Save {
        name: String,
        recipe: PathBuf,
    },
    /// Print a preset's recipe as JSON.
    Load { name: String },
    /// List preset names.
    #[command(alias = "ls")]
    List,
    /// Delete a preset.
    #[command(alias = "rm")]
    Delete { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_with_flags() {
        let cli = Cli::parse_from([
            "dough", "convert", "2", "tbsp", "g", "--ingredient", "olive_oil", "--json",
        ]);
        assert!(cli.global.json);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.amount, 2.0);
                assert_eq!(args.from, "tbsp");
                assert_eq!(args.ingredient, "olive_oil");
                assert!(args.total_flour.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_preset_save() {
        let cli = Cli::parse_from(["dough", "preset", "save", "Neapolitan", "neo.json"]);
        match cli.command {
            Commands::Preset(PresetCommand::Save { name, recipe }) => {
                assert_eq!(name, "Neapolitan");
                assert_eq!(recipe, PathBuf::from("neo.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
