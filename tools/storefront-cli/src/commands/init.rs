//! Write a default config and a sample draft.

use std::path::Path;

use anyhow::{Context as _, Result};
use dialoguer::Confirm;

use super::InitArgs;
use crate::config::{generate_default_config, generate_sample_draft};
use crate::context::Context;

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    ctx.output.header("Initializing storefront drafts");

    let files = [
        ("storefront.toml", generate_default_config()),
        ("product.toml", generate_sample_draft()),
    ];

    let mut written = 0;
    for (name, content) in &files {
        let path = ctx.cwd.join(name);
        if path.exists() && !should_overwrite(&path, &args)? {
            ctx.output.warn(&format!("Skipped existing {}", name));
            continue;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        ctx.output.success(&format!("Created: {}", path.display()));
        written += 1;
    }

    if written > 0 {
        ctx.output.info("");
        ctx.output.info("Next steps:");
        ctx.output.list_item("storefront variants product.toml");
        ctx.output.list_item("storefront fill product.toml --stock 10 --filter Đỏ");
        ctx.output.list_item("storefront payload product.toml");
    }

    Ok(())
}

fn should_overwrite(path: &Path, args: &InitArgs) -> Result<bool> {
    if args.force || args.yes {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(format!("{} exists. Overwrite?", path.display()))
        .default(false)
        .interact()?;
    Ok(confirmed)
}
