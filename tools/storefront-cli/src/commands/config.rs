//! Configuration commands.

use anyhow::Result;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let editor = &ctx.config.editor;
    ctx.output.info("");
    ctx.output.info("[editor]");
    ctx.output.kv("max_options", &editor.max_options.to_string());
    ctx.output.kv("max_images", &editor.max_images.to_string());
    ctx.output.kv("variant_types", &editor.variant_types.join(", "));
    ctx.output.kv("currency", editor.currency.code());

    ctx.output.info("");
    ctx.output.info("[editor.log]");
    ctx.output.kv("format", &format!("{:?}", editor.log.format).to_lowercase());
    ctx.output.kv("level", &editor.log.level.to_string());
    ctx.output.kv("sink", &format!("{:?}", editor.log.sink).to_lowercase());

    ctx.output.info("");
    ctx.output.info("[draft]");
    ctx.output.kv("path", &ctx.config.draft.path);

    Ok(())
}
