//! Default-value template applied to empty variant fields.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::variant::record::VariantRecord;

/// Values used to fill empty variant fields. Zero or blank template fields fill nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantTemplate {
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub original_price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub sold_count: i64,
    #[serde(default)]
    pub sku: String,
    /// Stored image reference (already uploaded).
    #[serde(default)]
    pub image: Option<String>,
}

/// Restricts a fill to rows whose value for one option is among `values`.
///
/// An empty value list, or a blank option name, matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillFilter {
    pub option: String,
    pub values: Vec<String>,
}

impl FillFilter {
    /// Match every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(option: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            option: option.into(),
            values,
        }
    }

    pub fn matches(&self, record: &VariantRecord) -> bool {
        if self.values.is_empty() || self.option.is_empty() {
            return true;
        }
        record
            .attribute(&self.option)
            .map(|value| self.values.iter().any(|v| v == value))
            .unwrap_or(false)
    }
}

/// What a fill changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Rows that passed the filter.
    pub rows_matched: usize,
    /// Individual fields written.
    pub fields_filled: usize,
    /// Positions whose image was filled from the template.
    pub images_filled: Vec<usize>,
}

/// Fills empty fields from a template without touching entered data.
pub struct TemplateFiller;

impl TemplateFiller {
    /// Fill each empty field of each row accepted by `filter`.
    ///
    /// Fields are independent: a row with a price but no SKU only gets its SKU.
    pub fn fill<F>(template: &VariantTemplate, rows: &mut [VariantRecord], filter: F) -> FillReport
    where
        F: Fn(&VariantRecord) -> bool,
    {
        let mut report = FillReport::default();
        for (position, row) in rows.iter_mut().enumerate() {
            if !filter(row) {
                continue;
            }
            report.rows_matched += 1;

            if row.price.is_zero() && !template.price.is_zero() {
                row.price = template.price;
                report.fields_filled += 1;
            }
            if row.original_price.is_zero() && !template.original_price.is_zero() {
                row.original_price = template.original_price;
                report.fields_filled += 1;
            }
            if row.stock == 0 && template.stock != 0 {
                row.stock = template.stock;
                report.fields_filled += 1;
            }
            if row.sold_count == 0 && template.sold_count != 0 {
                row.sold_count = template.sold_count;
                report.fields_filled += 1;
            }
            if row.sku.is_empty() && !template.sku.is_empty() {
                row.sku = template.sku.clone();
                report.fields_filled += 1;
            }
            let image = template.image.as_deref().filter(|i| !i.is_empty());
            if let (None, Some(image)) = (row.variation_image.as_deref(), image) {
                row.variation_image = Some(image.to_string());
                report.fields_filled += 1;
                report.images_filled.push(position);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use crate::variant::record::VariantAttribute;

    fn row(color: &str, sku: &str) -> VariantRecord {
        let mut record = VariantRecord::new(
            vec![VariantAttribute::new("Color", color)],
            Money::zero(Currency::VND),
            Money::zero(Currency::VND),
        );
        record.sku = sku.to_string();
        record
    }

    #[test]
    fn test_fill_never_overwrites() {
        let mut rows = vec![row("Red", "EXISTING"), row("Blue", "")];
        let template = VariantTemplate {
            sku: "DEFAULT".to_string(),
            ..Default::default()
        };
        let report = TemplateFiller::fill(&template, &mut rows, |_| true);
        assert_eq!(rows[0].sku, "EXISTING");
        assert_eq!(rows[1].sku, "DEFAULT");
        assert_eq!(report.rows_matched, 2);
        assert_eq!(report.fields_filled, 1);
    }

    #[test]
    fn test_fields_are_independent() {
        let mut rows = vec![row("Red", "")];
        rows[0].price = Money::new(90, Currency::VND);
        let template = VariantTemplate {
            price: Money::new(50, Currency::VND),
            stock: 7,
            sku: "T".to_string(),
            ..Default::default()
        };
        TemplateFiller::fill(&template, &mut rows, |_| true);
        assert_eq!(rows[0].price.amount, 90);
        assert_eq!(rows[0].stock, 7);
        assert_eq!(rows[0].sku, "T");
    }

    #[test]
    fn test_filter_limits_rows() {
        let mut rows = vec![row("Red", ""), row("Blue", ""), row("Green", "")];
        let filter = FillFilter::new("Color", vec!["Red".to_string(), "Green".to_string()]);
        let template = VariantTemplate {
            image: Some("img/template.png".to_string()),
            ..Default::default()
        };
        let report = TemplateFiller::fill(&template, &mut rows, |r| filter.matches(r));
        assert_eq!(report.images_filled, vec![0, 2]);
        assert!(rows[1].variation_image.is_none());
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(FillFilter::all().matches(&row("Red", "")));
        let filter = FillFilter::new("Size", vec!["S".to_string()]);
        assert!(!filter.matches(&row("Red", "")));
    }
}
