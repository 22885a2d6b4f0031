//! Cross-product generation, reconciliation and ordering of variant rows.

use std::collections::HashMap;

use crate::error::CatalogError;
use crate::money::{Currency, Money};
use crate::variant::option::OptionList;
use crate::variant::record::{IdentityKey, VariantAttribute, VariantRecord};
use crate::variant::move_item;

/// Field values for rows whose combination has never been seen before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDefaults {
    pub price: Money,
    pub original_price: Money,
}

impl VariantDefaults {
    pub fn new(price: Money, original_price: Money) -> Self {
        Self {
            price,
            original_price,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Money::zero(currency), Money::zero(currency))
    }
}

/// What a regeneration did to the previous rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Regeneration {
    /// Rows created with default fields.
    pub created: usize,
    /// Rows that carried their fields over from a previous row with the same identity.
    pub reconciled: usize,
    /// Previous rows whose combination is no longer produced.
    pub discarded: Vec<VariantRecord>,
}

impl Regeneration {
    /// Image references held by discarded rows.
    pub fn discarded_images(&self) -> impl Iterator<Item = &str> {
        self.discarded
            .iter()
            .filter_map(|r| r.variation_image.as_deref())
    }
}

/// The ordered set of variant rows for one product.
///
/// Holds exactly one row per combination of the valid options after every
/// regeneration; identity keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantMatrix {
    records: Vec<VariantRecord>,
}

impl VariantMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a matrix with stored rows (e.g. when opening an existing product).
    ///
    /// The rows are not checked against any option list; the next regeneration
    /// reconciles them.
    pub fn from_records(records: Vec<VariantRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&VariantRecord> {
        self.records.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut VariantRecord> {
        self.records.get_mut(position)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VariantRecord> {
        self.records.iter_mut()
    }

    /// Rows as a mutable slice. The row count cannot change through it.
    pub fn records_mut(&mut self) -> &mut [VariantRecord] {
        &mut self.records
    }

    /// Current position of the row with this identity.
    pub fn position_of(&self, key: &IdentityKey) -> Option<usize> {
        self.records.iter().position(|r| &r.identity_key() == key)
    }

    /// Identity keys in row order.
    pub fn identity_keys(&self) -> Vec<IdentityKey> {
        self.records.iter().map(VariantRecord::identity_key).collect()
    }

    /// Enumerate the combinations of the valid options, depth-first in declared order.
    ///
    /// Options still missing a name or values are skipped.
    pub fn combinations(options: &OptionList) -> Vec<Vec<VariantAttribute>> {
        let valid = options.valid_options();
        if valid.is_empty() {
            return Vec::new();
        }

        let mut combos: Vec<Vec<VariantAttribute>> = vec![Vec::with_capacity(valid.len())];
        for option in valid {
            let mut next = Vec::with_capacity(combos.len() * option.values.len());
            for combo in &combos {
                for value in option.values.iter() {
                    let mut extended = combo.clone();
                    extended.push(VariantAttribute::new(&option.name, &value.name));
                    next.push(extended);
                }
            }
            combos = next;
        }
        combos
    }

    /// Recompute the rows from `options`, reconciling against the current rows by identity key.
    ///
    /// Rows whose key is produced again keep every editable field; new keys get
    /// `defaults`; keys no longer produced are returned in `discarded`.
    pub fn regenerate(&mut self, options: &OptionList, defaults: &VariantDefaults) -> Regeneration {
        let previous = std::mem::take(&mut self.records);
        // First row wins when stored data carries the same identity twice.
        let mut by_key: HashMap<IdentityKey, usize> = HashMap::with_capacity(previous.len());
        for (index, record) in previous.iter().enumerate() {
            by_key.entry(record.identity_key()).or_insert(index);
        }
        let mut carried = vec![false; previous.len()];

        let mut outcome = Regeneration::default();
        let mut records = Vec::new();
        for attributes in Self::combinations(options) {
            let mut record =
                VariantRecord::new(attributes, defaults.price, defaults.original_price);
            match by_key.get(&record.identity_key()) {
                Some(&index) => {
                    record.take_fields_from(&previous[index]);
                    carried[index] = true;
                    outcome.reconciled += 1;
                }
                None => outcome.created += 1,
            }
            records.push(record);
        }

        outcome.discarded = previous
            .into_iter()
            .zip(carried)
            .filter(|(_, kept)| !kept)
            .map(|(record, _)| record)
            .collect();
        self.records = records;
        outcome
    }

    /// Order rows by each valid option's declared value order, first option first.
    ///
    /// A row missing an option (or holding a value the option no longer declares)
    /// sorts after the rows that have it at that level. The sort is stable.
    pub fn sort(&mut self, options: &OptionList) {
        let valid = options.valid_options();
        if valid.is_empty() || self.records.len() < 2 {
            return;
        }

        self.records.sort_by_cached_key(|record| {
            valid
                .iter()
                .map(|option| {
                    record
                        .attribute(&option.name)
                        .and_then(|value| option.values.position(value))
                        .unwrap_or(usize::MAX)
                })
                .collect::<Vec<usize>>()
        });
    }

    /// Set every row's price.
    pub fn apply_uniform_price(&mut self, price: Money) {
        for record in &mut self.records {
            record.price = price;
        }
    }

    /// Remove the row at `position`.
    pub fn remove(&mut self, position: usize) -> Result<VariantRecord, CatalogError> {
        if position >= self.records.len() {
            return Err(CatalogError::VariantOutOfRange(position));
        }
        Ok(self.records.remove(position))
    }

    /// Move a row (manual drag). The next `sort` restores the declared order.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        let len = self.records.len();
        for position in [from, to] {
            if position >= len {
                return Err(CatalogError::VariantOutOfRange(position));
            }
        }
        move_item(&mut self.records, from, to);
        Ok(())
    }

    /// Drop every row, returning them.
    pub fn clear(&mut self) -> Vec<VariantRecord> {
        std::mem::take(&mut self.records)
    }

    /// Lowest positive price among the rows.
    pub fn lowest_price(&self) -> Option<Money> {
        lowest_positive(self.records.iter().map(|r| r.price))
    }

    /// Lowest positive original price among the rows.
    pub fn lowest_original_price(&self) -> Option<Money> {
        lowest_positive(self.records.iter().map(|r| r.original_price))
    }
}

fn lowest_positive(prices: impl Iterator<Item = Money>) -> Option<Money> {
    prices
        .filter(Money::is_positive)
        .min_by_key(|m| m.amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vnd(amount: i64) -> Money {
        Money::new(amount, Currency::VND)
    }

    fn options(layout: &[(&str, &[&str])]) -> OptionList {
        let mut list = OptionList::new(3);
        for (i, (name, values)) in layout.iter().enumerate() {
            if i > 0 {
                list.add_option().unwrap();
            }
            list.rename_option(i, name).unwrap();
            for value in *values {
                list.add_value(i, value).unwrap();
            }
        }
        list
    }

    fn labels(matrix: &VariantMatrix) -> Vec<String> {
        matrix.records().iter().map(VariantRecord::label).collect()
    }

    #[test]
    fn test_cross_product_order() {
        let list = options(&[("Size", &["S", "M"]), ("Color", &["Red", "Blue"])]);
        let mut matrix = VariantMatrix::new();
        let outcome = matrix.regenerate(&list, &VariantDefaults::new(vnd(50), vnd(70)));
        assert_eq!(outcome.created, 4);
        assert_eq!(
            labels(&matrix),
            vec!["S / Red", "S / Blue", "M / Red", "M / Blue"]
        );
        assert!(matrix.records().iter().all(|r| r.price == vnd(50)));
        assert!(matrix.records().iter().all(|r| r.original_price == vnd(70)));
    }

    #[test]
    fn test_in_progress_option_keeps_rows() {
        let mut list = options(&[("Color", &["Red", "Blue"])]);
        let defaults = VariantDefaults::zero(Currency::VND);
        let mut matrix = VariantMatrix::new();
        matrix.regenerate(&list, &defaults);
        matrix.get_mut(0).unwrap().sku = "RED-1".to_string();

        list.add_option().unwrap();
        matrix.regenerate(&list, &defaults);
        assert_eq!(matrix.len(), 2, "blank option is ignored");

        list.rename_option(1, "Size").unwrap();
        let outcome = matrix.regenerate(&list, &defaults);
        assert_eq!(matrix.len(), 2, "named option without values is ignored");
        assert_eq!(outcome.reconciled, 2);
        assert!(outcome.discarded.is_empty());
        assert_eq!(matrix.get(0).unwrap().sku, "RED-1");

        list.add_value(1, "M").unwrap();
        let outcome = matrix.regenerate(&list, &defaults);
        assert_eq!(labels(&matrix), vec!["Red / M", "Blue / M"]);
        assert_eq!(outcome.discarded.len(), 2);
    }

    #[test]
    fn test_reconciliation_keeps_fields() {
        let mut list = options(&[("Color", &["Red", "Blue"]), ("Size", &["S", "M"])]);
        let defaults = VariantDefaults::new(vnd(10), vnd(0));
        let mut matrix = VariantMatrix::new();
        matrix.regenerate(&list, &defaults);
        matrix.get_mut(0).unwrap().price = vnd(100);
        matrix.get_mut(0).unwrap().sku = "RED-S".to_string();

        list.remove_value(0, 1).unwrap();
        let outcome = matrix.regenerate(&list, &defaults);
        assert_eq!(outcome.reconciled, 2);
        assert_eq!(outcome.discarded.len(), 2);
        assert_eq!(matrix.get(0).unwrap().price, vnd(100));
        assert_eq!(matrix.get(0).unwrap().sku, "RED-S");
    }

    #[test]
    fn test_regenerate_is_idempotent() {
        let list = options(&[("Color", &["Red", "Blue"]), ("Size", &["S"])]);
        let defaults = VariantDefaults::new(vnd(5), vnd(9));
        let mut matrix = VariantMatrix::new();
        matrix.regenerate(&list, &defaults);
        matrix.get_mut(1).unwrap().stock = 3;
        let first = matrix.clone();
        let outcome = matrix.regenerate(&list, &defaults);
        assert_eq!(matrix, first);
        assert_eq!(outcome.created, 0);
        assert!(outcome.discarded.is_empty());
    }

    #[test]
    fn test_sort_follows_declared_order() {
        let mut list = options(&[("Size", &["S", "M", "L"]), ("Color", &["Red", "Blue"])]);
        let mut matrix = VariantMatrix::new();
        matrix.regenerate(&list, &VariantDefaults::zero(Currency::VND));
        list.move_value(0, 2, 0).unwrap();
        list.move_option(1, 0).unwrap();
        matrix.sort(&list);
        assert_eq!(
            labels(&matrix),
            vec!["L / Red", "S / Red", "M / Red", "L / Blue", "S / Blue", "M / Blue"]
        );
    }

    #[test]
    fn test_sort_puts_missing_attributes_last() {
        let list = options(&[("Size", &["S", "M"])]);
        let mut matrix = VariantMatrix::from_records(vec![
            VariantRecord::new(vec![], vnd(1), vnd(0)),
            VariantRecord::new(vec![VariantAttribute::new("Size", "M")], vnd(1), vnd(0)),
            VariantRecord::new(vec![VariantAttribute::new("Size", "XL")], vnd(1), vnd(0)),
            VariantRecord::new(vec![VariantAttribute::new("Size", "S")], vnd(1), vnd(0)),
        ]);
        matrix.sort(&list);
        assert_eq!(labels(&matrix), vec!["S", "M", "Default", "XL"]);
    }

    #[test]
    fn test_remove_and_move_rows() {
        let list = options(&[("Color", &["Red", "Blue", "Green"])]);
        let mut matrix = VariantMatrix::new();
        matrix.regenerate(&list, &VariantDefaults::zero(Currency::VND));
        matrix.move_row(2, 0).unwrap();
        assert_eq!(labels(&matrix), vec!["Green", "Red", "Blue"]);
        let removed = matrix.remove(1).unwrap();
        assert_eq!(removed.label(), "Red");
        assert_eq!(matrix.remove(5), Err(CatalogError::VariantOutOfRange(5)));
    }

    #[test]
    fn test_lowest_prices_ignore_zero() {
        let list = options(&[("Color", &["Red", "Blue", "Green"])]);
        let mut matrix = VariantMatrix::new();
        matrix.regenerate(&list, &VariantDefaults::zero(Currency::VND));
        assert_eq!(matrix.lowest_price(), None);
        matrix.get_mut(1).unwrap().price = vnd(30);
        matrix.get_mut(2).unwrap().price = vnd(20);
        assert_eq!(matrix.lowest_price(), Some(vnd(20)));
        matrix.apply_uniform_price(vnd(45));
        assert_eq!(matrix.lowest_price(), Some(vnd(45)));
    }
}
