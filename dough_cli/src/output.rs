//! Output helpers for the `dough` CLI.

use serde::Serialize;

/// Print any serializable value as pretty JSON on stdout.
pub fn output_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize output: {}", e),
    }
}

pub fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[WARN]"
    }
}

pub const RULE: &str = "═══════════════════════════════════════";

pub fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
}

/// `weight` as a percentage of `flour`, or 0 for an empty batch
pub fn pct_of(weight: f64, flour: f64) -> f64 {
    if flour > 0.0 {
        weight / flour * 100.0
    } else {
        0.0
    }
}

/// One aligned "label  grams  percent" line
pub fn amount_line(label: &str, grams: f64, flour: f64) {
    println!("  {:<24} {:>9.1} g  {:>6.1}%", label, grams, pct_of(grams, flour));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_of_handles_empty_batch() {
        assert_eq!(pct_of(10.0, 0.0), 0.0);
        assert_eq!(pct_of(65.0, 100.0), 65.0);
    }
}
