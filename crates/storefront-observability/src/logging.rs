//! Structured logging with editor-session context.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::SessionId;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Error returned when a level or format name is not recognised.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseLogSettingError {
    kind: &'static str,
    value: String,
}

impl FromStr for LogLevel {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLogSettingError {
                kind: "log level",
                value: s.to_string(),
            }),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Editor session for correlation.
    pub session_id: String,
    /// Product being edited, once it has an id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Editor screen ("create" or "edit").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
    /// Microseconds since the session started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let mut fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            s.push_str(&fields.join(" "));
        }

        s
    }

    /// Look up a structured field.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

impl FromStr for LogFormat {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" => Ok(Self::Human),
            _ => Err(ParseLogSettingError {
                kind: "log format",
                value: s.to_string(),
            }),
        }
    }
}

/// In-memory entry buffer shared between a logger and its clones.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemorySink {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Entries recorded with the given message.
    pub fn find(&self, message: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }

    fn push(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }
}

/// Destination for emitted entries.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    /// Formatted lines on stderr.
    #[default]
    Stderr,
    /// Kept in memory, unformatted.
    Memory(MemorySink),
    /// Forwarded as `tracing` events; the host's subscriber decides what to do with them.
    Tracing,
}

/// Structured logger with editor-session context.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    session_id: SessionId,
    product: Option<String>,
    screen: Option<String>,
    start_time: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
    sink: LogSink,
}

impl StructuredLogger {
    /// Create a new logger for a session.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            product: None,
            screen: None,
            start_time: std::time::Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            sink: LogSink::Stderr,
        }
    }

    /// Set the product being edited.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Set the editor screen.
    pub fn with_screen(mut self, screen: impl Into<String>) -> Self {
        self.screen = Some(screen.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the sink.
    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Update the product context in place (after the backend assigns an id).
    pub fn set_product(&mut self, product: impl Into<String>) {
        self.product = Some(product.into());
    }

    fn log(&self, level: LogLevel, message: &str, fields: HashMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            session_id: self.session_id.to_string(),
            product: self.product.clone(),
            screen: self.screen.clone(),
            fields,
            elapsed_us: Some(self.start_time.elapsed().as_micros() as u64),
        };

        match &self.sink {
            LogSink::Stderr => {
                let output = match self.format {
                    LogFormat::Json => entry.to_json(),
                    LogFormat::Human => entry.to_human(),
                };
                eprintln!("{}", output);
            }
            LogSink::Memory(buffer) => buffer.push(entry),
            LogSink::Tracing => forward_to_tracing(&entry),
        }
    }

    /// Get the session ID.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }
}

fn forward_to_tracing(entry: &LogEntry) {
    let fields = serde_json::Value::Object(
        entry
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    );
    let session = entry.session_id.as_str();
    let product = entry.product.as_deref().unwrap_or("");
    match entry.level {
        LogLevel::Trace => {
            tracing::trace!(session, product, %fields, "{}", entry.message)
        }
        LogLevel::Debug => {
            tracing::debug!(session, product, %fields, "{}", entry.message)
        }
        LogLevel::Info => {
            tracing::info!(session, product, %fields, "{}", entry.message)
        }
        LogLevel::Warn => {
            tracing::warn!(session, product, %fields, "{}", entry.message)
        }
        LogLevel::Error => {
            tracing::error!(session, product, %fields, "{}", entry.message)
        }
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: HashMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a count field.
    pub fn field_usize(mut self, key: &str, value: usize) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building an error log entry.
    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_logger() -> (StructuredLogger, MemorySink) {
        let sink = MemorySink::new();
        let logger = StructuredLogger::new(SessionId::from_string("sess-test"))
            .with_screen("create")
            .with_sink(LogSink::Memory(sink.clone()));
        (logger, sink)
    }

    #[test]
    fn test_memory_sink_records_context() {
        let (logger, sink) = memory_logger();
        logger
            .warn_builder("upload failed")
            .field("identity", "Color:Red")
            .field_usize("position", 2)
            .emit();

        let entries = sink.find("upload failed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[0].session_id, "sess-test");
        assert_eq!(entries[0].screen.as_deref(), Some("create"));
        assert_eq!(entries[0].field("position"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn test_min_level_filters() {
        let (logger, sink) = memory_logger();
        let logger = logger.with_min_level(LogLevel::Warn);
        logger.info_builder("ignored").emit();
        logger.debug_builder("ignored too").emit();
        logger.error_builder("kept").field_i64("stock", -1).emit();
        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field("stock"), Some(&serde_json::json!(-1)));
    }

    #[test]
    fn test_tracing_sink_forwards_without_subscriber() {
        let logger = StructuredLogger::new(SessionId::from_string("sess-trace"))
            .with_sink(LogSink::Tracing);
        assert!(matches!(logger.sink(), LogSink::Tracing));
        // No subscriber is installed, so forwarding is a no-op.
        logger.warn_builder("forwarded").field("k", "v").emit();
    }

    #[test]
    fn test_human_format_sorts_fields() {
        let mut fields = HashMap::new();
        fields.insert("b".to_string(), serde_json::json!(2));
        fields.insert("a".to_string(), serde_json::json!(1));
        let entry = LogEntry {
            level: LogLevel::Info,
            message: "matrix regenerated".to_string(),
            session_id: "sess-1".to_string(),
            product: None,
            screen: None,
            fields,
            elapsed_us: None,
        };
        assert_eq!(entry.to_human(), "[INFO] matrix regenerated | a=1 b=2");
    }

    #[test]
    fn test_json_format_flattens_fields() {
        let (logger, sink) = memory_logger();
        let logger = logger.with_product("prod-9");
        logger.info_builder("saved").field_bool("created", true).emit();
        let json = sink.entries()[0].to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["created"], serde_json::json!(true));
        assert_eq!(value["product"], serde_json::json!("prod-9"));
        assert_eq!(value["level"], serde_json::json!("info"));
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
