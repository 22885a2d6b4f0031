//! Print the product store payload of a draft.

use anyhow::Result;

use super::PayloadArgs;
use crate::context::Context;
use crate::draft::open_draft;

/// Run the payload command.
pub async fn run(args: PayloadArgs, ctx: &Context) -> Result<()> {
    let path = ctx.draft_path(args.draft.as_deref());
    let draft = open_draft(&path, &ctx.config.editor, ctx.logger())?;
    let payload = draft.to_payload()?;

    // Always JSON: the payload is what the product store receives.
    ctx.output.json(&payload);
    Ok(())
}
