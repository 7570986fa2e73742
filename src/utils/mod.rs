//! Utility modules for benchmark diagnostics.

pub mod logging;

// Re-export commonly used functions
pub use logging::init_tracing;
