//! Editor configuration.

use serde::{Deserialize, Serialize};
use storefront_observability::{LogFormat, LogLevel, LogSink, SessionId, StructuredLogger};

use crate::money::Currency;

/// Default cap on the number of variant options per product.
pub const DEFAULT_MAX_OPTIONS: usize = 3;

/// Default cap on gallery images per product.
pub const DEFAULT_MAX_IMAGES: usize = 8;

/// Settings shared by the product create/edit editors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum number of options (axes of variation).
    #[serde(default = "default_max_options")]
    pub max_options: usize,

    /// Maximum number of gallery images.
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// Predefined option names offered in the option-name picker.
    #[serde(default = "default_variant_types")]
    pub variant_types: Vec<String>,

    /// Currency for every price entered in the editor.
    #[serde(default)]
    pub currency: Currency,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

fn default_max_options() -> usize {
    DEFAULT_MAX_OPTIONS
}

fn default_max_images() -> usize {
    DEFAULT_MAX_IMAGES
}

fn default_variant_types() -> Vec<String> {
    vec![
        "Kích thước".to_string(),
        "Màu".to_string(),
        "Giới tính".to_string(),
    ]
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_options: default_max_options(),
            max_images: default_max_images(),
            variant_types: default_variant_types(),
            currency: Currency::default(),
            log: LogConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Set the option cap (some screens allow only two options).
    pub fn with_max_options(mut self, max_options: usize) -> Self {
        self.max_options = max_options;
        self
    }

    /// Set the currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Build a logger for a new editor session.
    pub fn logger(&self) -> StructuredLogger {
        StructuredLogger::new(SessionId::generate())
            .with_format(self.log.format)
            .with_min_level(self.log.level)
            .with_sink(self.log.sink.into())
    }
}

/// Logging settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Minimum level.
    #[serde(default)]
    pub level: LogLevel,

    /// Where entries go.
    #[serde(default)]
    pub sink: LogDestination,
}

/// Configurable log destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDestination {
    /// Formatted lines on stderr.
    #[default]
    Stderr,
    /// `tracing` events for a host-installed subscriber.
    Tracing,
}

impl From<LogDestination> for LogSink {
    fn from(destination: LogDestination) -> Self {
        match destination {
            LogDestination::Stderr => LogSink::Stderr,
            LogDestination::Tracing => LogSink::Tracing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.max_options, 3);
        assert_eq!(config.max_images, 8);
        assert_eq!(config.variant_types.len(), 3);
        assert_eq!(config.currency, Currency::VND);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"max_options": 2, "log": {"level": "debug"}}"#).unwrap();
        assert_eq!(config.max_options, 2);
        assert_eq!(config.max_images, DEFAULT_MAX_IMAGES);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.sink, LogDestination::Stderr);
    }

    #[test]
    fn test_logger_honors_sink() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"log": {"sink": "tracing", "level": "warn"}}"#).unwrap();
        assert_eq!(config.log.sink, LogDestination::Tracing);
        assert!(matches!(config.logger().sink(), LogSink::Tracing));
        assert!(matches!(
            EditorConfig::default().logger().sink(),
            LogSink::Stderr
        ));
    }
}
