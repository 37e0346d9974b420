//! CLI command implementations.
//!
//! - **check**: evaluate the functional-core architecture over a program graph
//! - **classify**: print per-unit classifications along one axis
//! - **init**: write a default `.funcore.toml`

pub mod check;
pub mod classify;
pub mod init;

pub use check::{check_architecture, CheckConfig};
pub use classify::{classify_units, ClassifyConfig};
pub use init::init_config;

use crate::config::{load_config, load_config_file, FuncoreConfig};
use anyhow::Result;
use std::path::Path;

/// Explicit config file, or the nearest `.funcore.toml`, or defaults.
pub(crate) fn resolve_config(explicit: Option<&Path>) -> Result<FuncoreConfig> {
    match explicit {
        Some(path) => Ok(load_config_file(path)?),
        None => Ok(load_config()),
    }
}
