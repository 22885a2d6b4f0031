//! Structured logging for the storefront admin editors.
//!
//! This crate provides:
//! - `SessionId` - Identifier for one editor session (one open create/edit screen)
//! - `StructuredLogger` - Structured logging with session and product context
//! - `LogSink` - Where entries go: stderr, an in-memory buffer, or `tracing`

mod logging;
mod session;

pub use logging::*;
pub use session::*;
