//! Product draft files.
//!
//! A draft file is the CLI's stand-in for a product opened in the editor: the
//! product fields, its option configuration, and any rows entered earlier.
//! Amounts are integers in the currency's smallest unit.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use storefront_catalog::product::{Product, ProductDraft};
use storefront_catalog::variant::{OptionSnapshot, VariantAttribute, VariantRecord};
use storefront_catalog::{Currency, EditorConfig, Money, ProductId};
use storefront_observability::StructuredLogger;

/// On-disk product draft (TOML or JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftFile {
    pub name: String,
    /// Currency code; the configured currency when absent.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub original_price: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub sold_count: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub size_guide: Option<String>,
    /// Options in declared order. A draft with options uses variants.
    #[serde(default)]
    pub options: Vec<OptionSnapshot>,
    #[serde(default)]
    pub variants: Vec<VariantRow>,
}

/// A previously entered variant row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRow {
    /// Option name to value.
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub original_price: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub sold_count: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl DraftFile {
    /// Load a draft from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read draft: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON draft: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML draft: {}", path.display()))
        }
    }

    pub fn currency(&self, config: &EditorConfig) -> Result<Currency> {
        match &self.currency {
            None => Ok(config.currency),
            Some(code) => {
                Currency::from_code(code).ok_or_else(|| anyhow!("Unknown currency: {}", code))
            }
        }
    }

    /// Open the draft in an editor, reconciling the stored rows with the options.
    pub fn open(
        &self,
        id: &str,
        config: &EditorConfig,
        logger: StructuredLogger,
    ) -> Result<ProductDraft> {
        let currency = self.currency(config)?;
        let money = |amount: i64| Money::new(amount, currency);

        let variants = self
            .variants
            .iter()
            .map(|row| {
                let mut record = VariantRecord::new(
                    self.attributes_in_option_order(&row.attributes),
                    money(row.price),
                    money(row.original_price),
                );
                record.stock = row.stock;
                record.sold_count = row.sold_count;
                record.sku = row.sku.clone();
                record.variation_image = row.image.clone();
                record
            })
            .collect();

        let product = Product {
            id: ProductId::new(id),
            name: self.name.clone(),
            category_id: None,
            details: Vec::new(),
            images: self.images.clone(),
            size_guide: self.size_guide.clone(),
            sold_count: self.sold_count,
            price: money(self.price),
            original_price: money(self.original_price),
            stock: self.stock,
            sku: self.sku.clone(),
            has_variants: !self.options.is_empty(),
            variant_options: self.options.clone(),
            variants,
        };

        let config = EditorConfig {
            currency,
            ..config.clone()
        };
        ProductDraft::open_with_logger(&product, config, logger)
            .with_context(|| format!("Invalid option configuration in draft '{}'", self.name))
    }

    /// Attributes ordered like the declared options; unknown names go last.
    fn attributes_in_option_order(
        &self,
        attributes: &BTreeMap<String, String>,
    ) -> Vec<VariantAttribute> {
        let mut ordered: Vec<VariantAttribute> = self
            .options
            .iter()
            .filter_map(|o| {
                attributes
                    .get(&o.name)
                    .map(|value| VariantAttribute::new(&o.name, value))
            })
            .collect();
        for (name, value) in attributes {
            if !self.options.iter().any(|o| &o.name == name) {
                ordered.push(VariantAttribute::new(name, value));
            }
        }
        ordered
    }
}

/// Load and open the draft at `path`.
pub fn open_draft(
    path: &Path,
    config: &EditorConfig,
    logger: StructuredLogger,
) -> Result<ProductDraft> {
    let file = DraftFile::load(path)?;
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("draft");
    file.open(id, config, logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::generate_sample_draft;
    use storefront_observability::{LogSink, MemorySink, SessionId};

    fn logger() -> StructuredLogger {
        StructuredLogger::new(SessionId::from_string("sess-cli"))
            .with_sink(LogSink::Memory(MemorySink::new()))
    }

    #[test]
    fn test_sample_draft_opens_with_entered_row() {
        let file: DraftFile = toml::from_str(&generate_sample_draft()).unwrap();
        let draft = file
            .open("product", &EditorConfig::default(), logger())
            .unwrap();
        let records = draft.variants().records();
        assert_eq!(records.len(), 6);

        let red_m = records
            .iter()
            .find(|r| r.attribute("Màu") == Some("Đỏ") && r.attribute("Kích thước") == Some("M"))
            .unwrap();
        assert_eq!(red_m.sku, "AT-DO-M");
        assert_eq!(red_m.price.amount, 140_000);

        let blue_s = &records[3];
        assert_eq!(blue_s.label(), "Xanh / S");
        assert_eq!(blue_s.price.amount, 150_000);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let mut file: DraftFile = toml::from_str(&generate_sample_draft()).unwrap();
        file.currency = Some("XYZ".to_string());
        assert!(file.open("p", &EditorConfig::default(), logger()).is_err());
    }

    #[test]
    fn test_draft_without_options_is_simple() {
        let file: DraftFile = toml::from_str("name = \"Mug\"\nprice = 90000\nstock = 4").unwrap();
        let draft = file.open("mug", &EditorConfig::default(), logger()).unwrap();
        assert!(!draft.has_variants());
        assert_eq!(draft.to_payload().unwrap().price.amount, 90_000);
    }
}
