//! Stored product, the payload sent to the product store, and pricing helpers.

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use crate::variant::{OptionSnapshot, VariantRecord};

/// A titled rich-text section of the product description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub title: String,
    pub content: String,
}

impl ProductDetail {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Sections with neither a title nor content are not sent.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}

/// A product as returned by the product store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub details: Vec<ProductDetail>,
    /// Gallery image references, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub size_guide: Option<String>,
    #[serde(default)]
    pub sold_count: i64,
    /// Display price; the lowest variant price for products with variants.
    pub price: Money,
    pub original_price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub has_variants: bool,
    /// Option configuration the variants were generated from.
    #[serde(default)]
    pub variant_options: Vec<OptionSnapshot>,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

impl Product {
    /// Build the stored form of a payload.
    pub fn from_payload(id: ProductId, payload: &ProductPayload) -> Self {
        let (stock, sku, has_variants, variant_options, variants) = match &payload.variants {
            VariantSection::Simple { stock, sku, .. } => {
                (*stock, sku.clone(), false, Vec::new(), Vec::new())
            }
            VariantSection::Variants { options, variants } => {
                (0, String::new(), true, options.clone(), variants.clone())
            }
        };
        Self {
            id,
            name: payload.name.clone(),
            category_id: payload.category_id.clone(),
            details: payload.details.clone(),
            images: payload.images.clone(),
            size_guide: payload.size_guide.clone(),
            sold_count: payload.sold_count,
            price: payload.price,
            original_price: payload.original_price,
            stock,
            sku,
            has_variants,
            variant_options,
            variants,
        }
    }

    /// Total stock across variants, or the product's own stock.
    pub fn total_stock(&self) -> i64 {
        if self.has_variants {
            self.variants.iter().map(|v| v.stock).sum()
        } else {
            self.stock
        }
    }
}

/// Stock and pricing part of a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VariantSection {
    /// A product sold as a single item.
    #[serde(rename_all = "camelCase")]
    Simple {
        price: Money,
        original_price: Money,
        stock: i64,
        sku: String,
    },
    /// A product sold per variant; rows are in display order.
    Variants {
        options: Vec<OptionSnapshot>,
        variants: Vec<VariantRecord>,
    },
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub details: Vec<ProductDetail>,
    pub images: Vec<String>,
    pub size_guide: Option<String>,
    pub sold_count: i64,
    /// Listing price: the simple price, or the lowest variant price.
    pub price: Money,
    pub original_price: Money,
    pub variants: VariantSection,
}

/// Update request for an existing product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: ProductId,
    #[serde(flatten)]
    pub payload: ProductPayload,
    /// Gallery images the store should delete once the update is accepted.
    pub deleted_image_references: Vec<String>,
}

/// Discount shown next to the price, in whole percent.
///
/// Zero when either price is zero or the price is not below the original.
pub fn discount_percent(price: Money, original_price: Money) -> i64 {
    if price.is_zero() || original_price.is_zero() || price.amount >= original_price.amount {
        return 0;
    }
    let ratio = (original_price.amount - price.amount) as f64 / original_price.amount as f64;
    (ratio * 100.0).round() as i64
}
