//! Unified error types for the cursor and its decoders.
//!
//! Decoder-level failures ([`XlsbError`](crate::ooxml::xlsb::XlsbError)) are
//! wrapped here together with the consumer-misuse errors raised by the
//! streaming reader.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
