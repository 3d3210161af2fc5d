//! `dough formulate` -- gram amounts for a recipe.

use anyhow::Result;
use dough_core::calculations::{analyze, RecipeAnalysis};

use crate::cli::RecipeArgs;
use crate::commands::read_recipe;
use crate::context::RuntimeContext;
use crate::output::{amount_line, banner, output_json, status_icon, RULE};

pub fn run(ctx: &RuntimeContext, args: &RecipeArgs) -> Result<()> {
    let config = read_recipe(&args.recipe)?;
    let analysis = analyze(&config)?;

    if ctx.json {
        output_json(&analysis);
        return Ok(());
    }
    print_analysis(&analysis, config.hydration);
    Ok(())
}

fn print_analysis(analysis: &RecipeAnalysis, hydration: f64) {
    let dough = analysis.dough.rounded();
    let blend = &analysis.blend;
    let flour = analysis.dough.total_flour;

    banner(&format!("DOUGH: {} ({})", blend.composite_name, dough.technique.display_name()));
    println!();
    println!("Flour blend: W {} ({}), {:.1}% protein", blend.estimated_w, blend.strength_class(), blend.estimated_protein);
    println!();
    println!("Ingredients:");
    for line in &dough.flours {
        amount_line(&line.name, line.grams, flour);
    }
    amount_line("Water", dough.total_water, flour);
    amount_line("Salt", dough.total_salt, flour);
    if dough.total_oil > 0.0 {
        amount_line("Oil", dough.total_oil, flour);
    }
    if dough.total_sugar > 0.0 {
        amount_line("Sugar", dough.total_sugar, flour);
    }
    amount_line("Yeast", dough.total_yeast, flour);
    for line in &dough.extras {
        amount_line(&line.name, line.grams, flour);
    }
    println!("  {:<24} {:>9.1} g", "Total", dough.total_dough);

    if let (Some(pre), Some(fin)) = (dough.preferment, dough.final_dough) {
        println!();
        println!("Preferment ({}):", dough.technique.display_name());
        println!("  {:<24} {:>9.1} g", "Flour", pre.flour);
        println!("  {:<24} {:>9.1} g", "Water", pre.water);
        println!("  {:<24} {:>9.1} g", "Yeast", pre.yeast);
        println!();
        println!("Final dough:");
        println!("  {:<24} {:>9.1} g", "Preferment", pre.total());
        println!("  {:<24} {:>9.1} g", "Flour", fin.flour);
        println!("  {:<24} {:>9.1} g", "Water", fin.water);
        println!("  {:<24} {:>9.1} g", "Salt", fin.salt);
        if fin.oil > 0.0 {
            println!("  {:<24} {:>9.1} g", "Oil", fin.oil);
        }
        if fin.sugar > 0.0 {
            println!("  {:<24} {:>9.1} g", "Sugar", fin.sugar);
        }
        println!("  {:<24} {:>9.1} g", "Yeast", fin.yeast);
        if fin.extras > 0.0 {
            println!("  {:<24} {:>9.1} g", "Extras", fin.extras);
        }
    }

    println!();
    println!("{}", RULE);
    match (&blend.hydration_hint, analysis.hydration_in_range) {
        (Some(range), Some(ok)) => println!(
            "  Hydration {:.1}% (blend range {:.1}-{:.1}%) {}",
            hydration,
            range.min,
            range.max,
            status_icon(ok)
        ),
        _ => println!("  Hydration {:.1}%", hydration),
    }
    println!("{}", RULE);
}
