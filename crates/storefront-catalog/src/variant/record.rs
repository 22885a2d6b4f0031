//! Variant records and their identity keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::VariantId;
use crate::money::Money;

/// One coordinate of a variant (e.g. Size: L).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantAttribute {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Option value (e.g., "L", "Blue").
    pub value: String,
}

impl VariantAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Order-independent identity of a variant: its attribute pairs, sorted.
///
/// Two records carrying the same attributes in a different order have the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(Vec<(String, String)>);

impl IdentityKey {
    pub fn from_attributes(attributes: &[VariantAttribute]) -> Self {
        let mut pairs: Vec<(String, String)> = attributes
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();
        pairs.sort();
        Self(pairs)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(n, v)| format!("{}:{}", n, v)).collect();
        write!(f, "{}", parts.join("|"))
    }
}

/// One sellable combination and its editable fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    /// Backend id, present once the product has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VariantId>,
    /// One assignment per valid option, in option order.
    pub attributes: Vec<VariantAttribute>,
    pub price: Money,
    pub original_price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub sold_count: i64,
    #[serde(default)]
    pub sku: String,
    /// Image store reference for this variant's picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_image: Option<String>,
}

impl VariantRecord {
    /// A fresh record for a combination that has never been seen.
    pub fn new(attributes: Vec<VariantAttribute>, price: Money, original_price: Money) -> Self {
        Self {
            id: None,
            attributes,
            price,
            original_price,
            stock: 0,
            sold_count: 0,
            sku: String::new(),
            variation_image: None,
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::from_attributes(&self.attributes)
    }

    /// Value assigned for an option, if any.
    pub fn attribute(&self, option: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == option)
            .map(|a| a.value.as_str())
    }

    /// Copy the editable fields (everything except the attributes) from `other`.
    pub fn take_fields_from(&mut self, other: &VariantRecord) {
        self.id = other.id.clone();
        self.price = other.price;
        self.original_price = other.original_price;
        self.stock = other.stock;
        self.sold_count = other.sold_count;
        self.sku = other.sku.clone();
        self.variation_image = other.variation_image.clone();
    }

    /// Label such as "Red / L".
    pub fn label(&self) -> String {
        if self.attributes.is_empty() {
            "Default".to_string()
        } else {
            self.attributes
                .iter()
                .map(|a| a.value.as_str())
                .collect::<Vec<_>>()
                .join(" / ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn record(attrs: &[(&str, &str)]) -> VariantRecord {
        VariantRecord::new(
            attrs.iter().map(|(n, v)| VariantAttribute::new(*n, *v)).collect(),
            Money::new(100, Currency::VND),
            Money::zero(Currency::VND),
        )
    }

    #[test]
    fn test_identity_key_ignores_order() {
        let a = record(&[("Size", "L"), ("Color", "Red")]);
        let b = record(&[("Color", "Red"), ("Size", "L")]);
        assert_eq!(a.identity_key(), b.identity_key());
        assert_eq!(a.identity_key().to_string(), "Color:Red|Size:L");
    }

    #[test]
    fn test_identity_key_does_not_collide_on_separators() {
        let a = record(&[("A", "x|B:y")]);
        let b = record(&[("A", "x"), ("B", "y")]);
        assert_ne!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_take_fields_keeps_attributes() {
        let mut fresh = record(&[("Color", "Red")]);
        let mut old = record(&[("Color", "Blue")]);
        old.sku = "BLUE-1".to_string();
        old.stock = 4;
        old.id = Some(VariantId::new("v-1"));
        fresh.take_fields_from(&old);
        assert_eq!(fresh.attribute("Color"), Some("Red"));
        assert_eq!(fresh.sku, "BLUE-1");
        assert_eq!(fresh.stock, 4);
        assert_eq!(fresh.id, Some(VariantId::new("v-1")));
    }

    #[test]
    fn test_label() {
        assert_eq!(record(&[("Color", "Red"), ("Size", "L")]).label(), "Red / L");
        assert_eq!(record(&[]).label(), "Default");
    }
}
