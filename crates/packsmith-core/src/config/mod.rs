//! Runtime configuration loading

mod hierarchical_loader;

pub use hierarchical_loader::{HierarchicalConfigLoader, PROJECT_CONFIG_FILE, USER_CONFIG_FILE};
