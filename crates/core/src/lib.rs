//! Permafolio Core - allocation engine and financial calculators.
//!
//! Everything here is a pure, synchronous computation over fixed-point
//! decimals. Input parsing and output rendering belong to the callers.

pub mod allocation;
pub mod calculators;
pub mod constants;
pub mod errors;
pub mod settings;
pub mod utils;

pub use allocation::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
