//! Print the variant matrix of a draft.

use anyhow::Result;

use super::VariantsArgs;
use crate::context::Context;
use crate::draft::open_draft;

/// Run the variants command.
pub async fn run(args: VariantsArgs, ctx: &Context) -> Result<()> {
    let path = ctx.draft_path(args.draft.as_deref());
    ctx.output.debug(&format!("Loading draft: {}", path.display()));
    let draft = open_draft(&path, &ctx.config.editor, ctx.logger())?;

    ctx.output.header(&format!("Variants of {}", draft.name));
    if !draft.has_variants() {
        ctx.output.info("Product has no options; it is sold as a single item.");
        ctx.output.kv("price", &draft.price().display());
        ctx.output.kv("stock", &draft.stock.to_string());
        return Ok(());
    }

    for option in draft.variants().options().iter() {
        ctx.output.kv(&option.name, &option.values.names().join(", "));
    }
    ctx.output.info("");
    ctx.output.variant_table(draft.variants().records());

    ctx.output.info("");
    ctx.output.kv("rows", &draft.variants().records().len().to_string());
    ctx.output.kv("display price", &draft.display_price().display());
    let discount = draft.discount_percent();
    if discount > 0 {
        ctx.output.kv("discount", &format!("{}%", discount));
    }

    Ok(())
}
