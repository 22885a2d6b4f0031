//! Options (axes of variation) and their ordered value sets.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::variant::move_item;

/// One concrete choice along an option's axis (e.g. "Red").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionValue {
    pub name: String,
}

impl OptionValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered, duplicate-free list of option values.
///
/// Duplicate detection is case-sensitive: "red" and "Red" are distinct values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSet {
    values: Vec<OptionValue>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionValue> {
        self.values.iter()
    }

    /// Value names in declared order.
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.name.as_str()).collect()
    }

    /// Declared position of a value.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.values.iter().position(|v| v.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Append a value. The name is trimmed; blank names and duplicates are rejected.
    ///
    /// `option` is only used to describe a duplicate in the error.
    pub fn insert(&mut self, option: &str, name: &str) -> Result<usize, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::BlankValue);
        }
        if self.contains(name) {
            return Err(CatalogError::DuplicateValue {
                option: option.to_string(),
                value: name.to_string(),
            });
        }
        self.values.push(OptionValue::new(name));
        Ok(self.values.len() - 1)
    }

    fn remove(&mut self, index: usize) -> Option<OptionValue> {
        if index < self.values.len() {
            Some(self.values.remove(index))
        } else {
            None
        }
    }
}

/// A named axis of variation with its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub name: String,
    pub values: ValueSet,
}

impl VariantOption {
    /// Create an option with a name and no values.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: ValueSet::new(),
        }
    }

    /// A valid option has a name and at least one value; only valid options generate variants.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.values.is_empty()
    }
}

/// Option name and ordered value names, as stored alongside the variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSnapshot {
    pub name: String,
    pub values: Vec<String>,
}

impl From<&VariantOption> for OptionSnapshot {
    fn from(option: &VariantOption) -> Self {
        Self {
            name: option.name.clone(),
            values: option.values.iter().map(|v| v.name.clone()).collect(),
        }
    }
}

/// Ordered list of options with a cap on its length and unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionList {
    options: Vec<VariantOption>,
    max_options: usize,
}

impl OptionList {
    /// Create a list holding a single empty in-progress option, like a fresh editor.
    pub fn new(max_options: usize) -> Self {
        let options = if max_options > 0 {
            vec![VariantOption::default()]
        } else {
            Vec::new()
        };
        Self {
            options,
            max_options,
        }
    }

    /// Rebuild a list from stored snapshots, validating names and values as if typed in.
    pub fn from_snapshots(
        max_options: usize,
        snapshots: &[OptionSnapshot],
    ) -> Result<Self, CatalogError> {
        if snapshots.len() > max_options {
            return Err(CatalogError::OptionLimitReached { max: max_options });
        }
        let mut list = Self {
            options: Vec::with_capacity(snapshots.len()),
            max_options,
        };
        for snapshot in snapshots {
            let index = list.add_option()?;
            list.rename_option(index, &snapshot.name)?;
            for value in &snapshot.values {
                list.add_value(index, value)?;
            }
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn max_options(&self) -> usize {
        self.max_options
    }

    pub fn get(&self, index: usize) -> Option<&VariantOption> {
        self.options.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariantOption> {
        self.options.iter()
    }

    /// Append an empty option.
    pub fn add_option(&mut self) -> Result<usize, CatalogError> {
        if self.options.len() >= self.max_options {
            return Err(CatalogError::OptionLimitReached {
                max: self.max_options,
            });
        }
        self.options.push(VariantOption::default());
        Ok(self.options.len() - 1)
    }

    /// Remove the option at `index`.
    pub fn remove_option(&mut self, index: usize) -> Result<VariantOption, CatalogError> {
        if index >= self.options.len() {
            return Err(CatalogError::OptionOutOfRange(index));
        }
        Ok(self.options.remove(index))
    }

    /// Set an option's name. A blank name is allowed (the option goes back to in-progress);
    /// a name already used by another option is rejected.
    pub fn rename_option(&mut self, index: usize, name: &str) -> Result<(), CatalogError> {
        let name = name.trim();
        if index >= self.options.len() {
            return Err(CatalogError::OptionOutOfRange(index));
        }
        let taken = self
            .options
            .iter()
            .enumerate()
            .any(|(i, o)| i != index && !name.is_empty() && o.name == name);
        if taken {
            return Err(CatalogError::DuplicateOptionName(name.to_string()));
        }
        self.options[index].name = name.to_string();
        Ok(())
    }

    /// Move an option to a new position, keeping its values.
    pub fn move_option(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        let len = self.options.len();
        if from >= len {
            return Err(CatalogError::OptionOutOfRange(from));
        }
        if to >= len {
            return Err(CatalogError::OptionOutOfRange(to));
        }
        move_item(&mut self.options, from, to);
        Ok(())
    }

    /// Append a value to an option.
    pub fn add_value(&mut self, option_index: usize, name: &str) -> Result<usize, CatalogError> {
        let option = self
            .options
            .get_mut(option_index)
            .ok_or(CatalogError::OptionOutOfRange(option_index))?;
        option.values.insert(&option.name, name)
    }

    /// Remove a value from an option.
    pub fn remove_value(
        &mut self,
        option_index: usize,
        value_index: usize,
    ) -> Result<OptionValue, CatalogError> {
        let option = self
            .options
            .get_mut(option_index)
            .ok_or(CatalogError::OptionOutOfRange(option_index))?;
        option
            .values
            .remove(value_index)
            .ok_or(CatalogError::ValueOutOfRange {
                option: option_index,
                value: value_index,
            })
    }

    /// Move a value within its option.
    pub fn move_value(
        &mut self,
        option_index: usize,
        from: usize,
        to: usize,
    ) -> Result<(), CatalogError> {
        let option = self
            .options
            .get_mut(option_index)
            .ok_or(CatalogError::OptionOutOfRange(option_index))?;
        let len = option.values.len();
        for index in [from, to] {
            if index >= len {
                return Err(CatalogError::ValueOutOfRange {
                    option: option_index,
                    value: index,
                });
            }
        }
        move_item(&mut option.values.values, from, to);
        Ok(())
    }

    /// Options with a name and at least one value, in declared order.
    pub fn valid_options(&self) -> Vec<&VariantOption> {
        self.options.iter().filter(|o| o.is_valid()).collect()
    }

    /// Snapshots of the valid options, in declared order.
    pub fn snapshots(&self) -> Vec<OptionSnapshot> {
        self.valid_options().into_iter().map(OptionSnapshot::from).collect()
    }

    /// Predefined option names not already used by another option.
    pub fn available_variant_types(&self, index: usize, catalog: &[String]) -> Vec<String> {
        let used: Vec<&str> = self
            .options
            .iter()
            .enumerate()
            .filter(|(i, o)| *i != index && !o.name.is_empty())
            .map(|(_, o)| o.name.as_str())
            .collect();
        catalog
            .iter()
            .filter(|t| !used.contains(&t.as_str()))
            .cloned()
            .collect()
    }

    /// Values of the first option; these are the choices offered by the fill filter.
    pub fn first_option_values(&self) -> Vec<&str> {
        self.options
            .first()
            .map(|o| o.values.names())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_size() -> OptionList {
        let mut list = OptionList::new(3);
        list.rename_option(0, "Color").unwrap();
        list.add_value(0, "Red").unwrap();
        list.add_value(0, "Blue").unwrap();
        let size = list.add_option().unwrap();
        list.rename_option(size, "Size").unwrap();
        list.add_value(size, "S").unwrap();
        list
    }

    #[test]
    fn test_add_value_trims_and_rejects_blank() {
        let mut list = OptionList::new(2);
        list.rename_option(0, "Color").unwrap();
        list.add_value(0, "  Red ").unwrap();
        assert_eq!(list.get(0).unwrap().values.names(), vec!["Red"]);
        assert_eq!(list.add_value(0, "   "), Err(CatalogError::BlankValue));
    }

    #[test]
    fn test_duplicate_value_is_case_sensitive() {
        let mut list = OptionList::new(2);
        list.rename_option(0, "Color").unwrap();
        list.add_value(0, "Red").unwrap();
        let err = list.add_value(0, "Red").unwrap_err();
        assert!(err.is_configuration());
        assert!(list.add_value(0, "red").is_ok());
        assert_eq!(list.get(0).unwrap().values.len(), 2);
    }

    #[test]
    fn test_option_cap() {
        let mut list = OptionList::new(2);
        list.add_option().unwrap();
        assert_eq!(
            list.add_option(),
            Err(CatalogError::OptionLimitReached { max: 2 })
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_duplicate_option_name_rejected() {
        let mut list = color_size();
        let err = list.rename_option(1, "Color").unwrap_err();
        assert_eq!(err, CatalogError::DuplicateOptionName("Color".to_string()));
        assert_eq!(list.get(1).unwrap().name, "Size");
        // Two in-progress options may both be blank.
        list.add_option().unwrap();
        list.rename_option(1, "").unwrap();
        assert_eq!(list.get(1).unwrap().name, "");
    }

    #[test]
    fn test_valid_options_skip_in_progress_rows() {
        let mut list = color_size();
        list.add_option().unwrap();
        let valid: Vec<&str> = list.valid_options().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(valid, vec!["Color", "Size"]);

        list.rename_option(2, "Gender").unwrap();
        assert_eq!(list.valid_options().len(), 2);
    }

    #[test]
    fn test_move_option_preserves_contents() {
        let mut list = color_size();
        list.move_option(1, 0).unwrap();
        assert_eq!(list.get(0).unwrap().name, "Size");
        assert_eq!(list.get(1).unwrap().values.names(), vec!["Red", "Blue"]);
        assert!(list.move_option(0, 5).is_err());
    }

    #[test]
    fn test_move_and_remove_value() {
        let mut list = color_size();
        list.add_value(0, "Green").unwrap();
        list.move_value(0, 2, 0).unwrap();
        assert_eq!(list.get(0).unwrap().values.names(), vec!["Green", "Red", "Blue"]);
        let removed = list.remove_value(0, 1).unwrap();
        assert_eq!(removed.name, "Red");
        assert_eq!(
            list.remove_value(0, 9),
            Err(CatalogError::ValueOutOfRange { option: 0, value: 9 })
        );
    }

    #[test]
    fn test_available_variant_types() {
        let catalog = vec!["Size".to_string(), "Color".to_string(), "Gender".to_string()];
        let list = color_size();
        assert_eq!(list.available_variant_types(0, &catalog), vec!["Color", "Gender"]);
        assert_eq!(list.available_variant_types(1, &catalog), vec!["Size", "Gender"]);
    }

    #[test]
    fn test_snapshots_round_trip() {
        let list = color_size();
        let snapshots = list.snapshots();
        let rebuilt = OptionList::from_snapshots(3, &snapshots).unwrap();
        assert_eq!(rebuilt.snapshots(), snapshots);
        assert!(OptionList::from_snapshots(1, &snapshots).is_err());
    }

    #[test]
    fn test_first_option_values() {
        assert_eq!(color_size().first_option_values(), vec!["Red", "Blue"]);
        assert!(OptionList::new(0).first_option_values().is_empty());
    }
}
