//! `dough template` -- starter recipe JSON from the settings defaults.

use anyhow::Result;

use crate::context::RuntimeContext;
use crate::output::output_json;

pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let config = ctx.settings.default_config();
    config.validate()?;
    output_json(&config);
    Ok(())
}
