//! Catalog error types.

use thiserror::Error;

/// Errors raised by the catalog editors.
///
/// Configuration errors are returned synchronously by the mutating call and leave
/// the editor state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two options would share a name.
    #[error("Duplicate option name: {0}")]
    DuplicateOptionName(String),

    /// The option list is already at its cap.
    #[error("Option limit reached: at most {max} options")]
    OptionLimitReached { max: usize },

    /// The value already exists in the option.
    #[error("Duplicate value {value} in option {option}")]
    DuplicateValue { option: String, value: String },

    /// Value name was blank after trimming.
    #[error("Option value must not be blank")]
    BlankValue,

    /// No option at this index.
    #[error("Option index out of range: {0}")]
    OptionOutOfRange(usize),

    /// No value at this index in the option.
    #[error("Value index {value} out of range for option {option}")]
    ValueOutOfRange { option: usize, value: usize },

    /// No variant row at this position.
    #[error("Variant position out of range: {0}")]
    VariantOutOfRange(usize),

    /// The gallery is full.
    #[error("Image limit reached: at most {max} images")]
    ImageLimitReached { max: usize },

    /// No gallery image at this index.
    #[error("Image index out of range: {0}")]
    ImageOutOfRange(usize),

    /// The operation needs variants switched on.
    #[error("Product does not use variants")]
    VariantsDisabled,

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CatalogError {
    /// True for errors caused by an invalid option/value configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateOptionName(_)
                | CatalogError::OptionLimitReached { .. }
                | CatalogError::DuplicateValue { .. }
                | CatalogError::BlankValue
        )
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}
