//! Application-level utilities for the storefront CLI.
//!
//! This module provides:
//! - Path resolution for the config file and the snapshot directory
//! - A per-invocation context with lazily loaded configuration

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::{missing_snapshot_hint, resolve_config_path, resolve_data_dir};
