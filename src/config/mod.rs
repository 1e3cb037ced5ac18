//! Connection configuration
//!
//! Sources, lowest priority first:
//! - `<config_dir>/cortex-catalog/config.toml` (or `--config <path>`)
//! - `CORTEX_API_KEY` / `CORTEX_BASE_URL`
//! - command line flags

mod connection;

pub use connection::{ConnectionConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
