//! `dough convert` -- unit conversion for a single ingredient.

use anyhow::{bail, Result};
use dough_core::units::{convert, Unit};
use serde_json::json;

use crate::cli::ConvertArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

pub fn run(ctx: &RuntimeContext, args: &ConvertArgs) -> Result<()> {
    check_amount(args.amount)?;
    let from: Unit = args.from.parse()?;
    let to: Unit = args.to.parse()?;

    let uses_percent = from == Unit::Percent || to == Unit::Percent;
    let mut conversion = ctx.settings.conversion_context();
    match args.total_flour {
        Some(total) if total > 0.0 => conversion = conversion.with_total_flour(total),
        _ if uses_percent && from != to => bail!("--total-flour is required to convert to or from %"),
        _ => {}
    }

    let result = convert(args.amount, from, to, &args.ingredient, &conversion);
    // Only a volume on exactly one side goes through the ingredient density
    let density = (from.is_volume() != to.is_volume()).then(|| conversion.density_for(&args.ingredient));

    if ctx.json {
        output_json(&json!({
            "amount": args.amount,
            "from": from,
            "to": to,
            "ingredient": args.ingredient,
            "result": result,
            "density_g_per_ml": density,
        }));
    } else {
        println!("{} {} {} = {:.2} {}", args.amount, from, args.ingredient, result, to);
        if let Some(d) = density {
            println!("  at {:.2} g/ml", d);
        }
    }
    Ok(())
}

/// Rejects amounts `convert` would silently turn into 0.
fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        bail!("amount must be a finite number, got {}", amount);
    }
    if amount < 0.0 {
        bail!("amount cannot be negative, got {}", amount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        let err = check_amount(-5.0).unwrap_err();
        assert!(err.to_string().contains("negative"));
        assert!(check_amount(f64::NAN).is_err());
        assert!(check_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_zero_and_positive_amounts() {
        assert!(check_amount(0.0).is_ok());
        assert!(check_amount(2.5).is_ok());
    }
}
