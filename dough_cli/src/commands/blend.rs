//! `dough blend` -- balanced flour blend and estimated characteristics.

use anyhow::Result;
use dough_core::calculations::{balance, estimate, BlendResult};
use dough_core::catalog::find_flour;
use serde::Serialize;

use crate::cli::RecipeArgs;
use crate::commands::read_recipe;
use crate::context::RuntimeContext;
use crate::output::{banner, output_json};

#[derive(Serialize)]
struct BlendView {
    flours: Vec<FlourShare>,
    estimate: BlendResult,
}

#[derive(Serialize)]
struct FlourShare {
    id: String,
    name: String,
    percentage: f64,
    main: bool,
    in_catalog: bool,
}

pub fn run(ctx: &RuntimeContext, args: &RecipeArgs) -> Result<()> {
    let config = read_recipe(&args.recipe)?;
    config.validate()?;

    let balanced = balance(&config.ingredients, &config.flour_id);
    let view = BlendView {
        flours: balanced
            .flours()
            .map(|f| FlourShare {
                id: f.id.clone(),
                name: f.name.clone(),
                percentage: f.baker_percentage,
                main: f.id == config.flour_id,
                in_catalog: find_flour(&f.id).is_some(),
            })
            .collect(),
        estimate: estimate(&balanced),
    };

    if ctx.json {
        output_json(&view);
        return Ok(());
    }

    banner(&format!("BLEND: {}", view.estimate.composite_name));
    for share in &view.flours {
        let mut notes = Vec::new();
        if share.main {
            notes.push("main");
        }
        if !share.in_catalog {
            notes.push("generic values");
        }
        let suffix = if notes.is_empty() {
            String::new()
        } else {
            format!("  ({})", notes.join(", "))
        };
        println!("  {:<24} {:>6.1}%{}", share.name, share.percentage, suffix);
    }
    println!();
    println!(
        "  Strength W: {} ({})",
        view.estimate.estimated_w,
        view.estimate.strength_class()
    );
    println!("  Protein:    {:.1}%", view.estimate.estimated_protein);
    if let Some(range) = &view.estimate.hydration_hint {
        println!("  Hydration:  {:.1}-{:.1}%", range.min, range.max);
    }
    Ok(())
}
