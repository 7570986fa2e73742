pub mod tree;
pub mod index;
pub mod cache;
pub mod config;
pub mod error;
pub mod worker;
pub mod driver;
pub mod report;
pub mod utils;

// Export tree construction
pub use tree::{TreeNode, build_tree, expected_node_count};

// Export index selection
pub use index::{AccessMode, IndexSelector, select_index, sequential_index};

// Export the shared cache
pub use cache::TreeCache;

// Export configuration and errors
pub use config::{BenchConfig, RawConfig, MAX_TREE_HEIGHT};
pub use error::{BenchError, Result};

// Export execution
pub use worker::run_worker;
pub use driver::{Driver, DriverState, run_benchmark};
pub use report::{RunResult, WorkerReport};
