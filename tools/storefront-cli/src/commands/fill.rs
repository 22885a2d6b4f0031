//! Fill empty variant fields of a draft from a template.

use anyhow::{bail, Result};
use storefront_catalog::variant::{FillFilter, VariantTemplate};
use storefront_catalog::Money;

use super::FillArgs;
use crate::context::Context;
use crate::draft::open_draft;

/// Run the fill command.
pub async fn run(args: FillArgs, ctx: &Context) -> Result<()> {
    let path = ctx.draft_path(args.draft.as_deref());
    let mut draft = open_draft(&path, &ctx.config.editor, ctx.logger())?;
    let currency = draft.config().currency;
    let money = |amount: Option<i64>| Money::new(amount.unwrap_or(0), currency);

    let template = VariantTemplate {
        price: money(args.price),
        original_price: money(args.original_price),
        stock: args.stock.unwrap_or(0),
        sold_count: args.sold.unwrap_or(0),
        sku: args.sku.clone().unwrap_or_default(),
        image: args.image.clone(),
    };

    let option = match args.filter_option.clone() {
        Some(name) => name,
        None => draft
            .variants()
            .options()
            .get(0)
            .map(|o| o.name.clone())
            .unwrap_or_default(),
    };
    if !args.filter.is_empty() {
        let known = draft
            .variants()
            .options()
            .iter()
            .find(|o| o.name == option)
            .map(|o| o.values.clone());
        let Some(known) = known else {
            bail!("Unknown option for --filter: '{}'", option);
        };
        for value in &args.filter {
            if !known.contains(value) {
                bail!("'{}' is not a value of option '{}'", value, option);
            }
        }
    }
    let filter = FillFilter::new(option, args.filter.clone());

    let editor = draft.variants_mut()?;
    let report = editor.fill_from_template(&template, |r| filter.matches(r))?;

    ctx.output.header(&format!("Filled {}", draft.name));
    ctx.output.kv("rows matched", &report.rows_matched.to_string());
    ctx.output.kv("fields filled", &report.fields_filled.to_string());
    ctx.output.info("");
    ctx.output.variant_table(draft.variants().records());

    Ok(())
}
