//! The shared slot array that benchmark workers overwrite.

pub mod tree_cache;

// Re-export commonly used types
pub use tree_cache::TreeCache;
