//! `dough flours` -- print the flour catalog grouped by category.

use anyhow::Result;
use dough_core::catalog::{all_flours, flours_by_category, FlourCategory};

use crate::context::RuntimeContext;
use crate::output::output_json;

pub fn run(ctx: &RuntimeContext) -> Result<()> {
    if ctx.json {
        output_json(all_flours());
        return Ok(());
    }

    for category in FlourCategory::ALL {
        let flours = flours_by_category(category);
        if flours.is_empty() {
            continue;
        }
        println!("{}:", category);
        for flour in flours {
            let w = match flour.strength_w {
                Some(w) => format!("W{:.0}", w),
                None => "W?".to_string(),
            };
            println!(
                "  {:<20} {:<26} {:>5}  {:>5.1}% protein  {:.0}-{:.0}% hydration",
                flour.id,
                flour.name,
                w,
                flour.protein(),
                flour.hydration_hint.min,
                flour.hydration_hint.max
            );
        }
        println!();
    }
    Ok(())
}
