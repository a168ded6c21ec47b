//! Configuration Management
//!
//! Layered configuration with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/swfvec/config.toml)
//! 3. Project config (./swfvec.toml)
//! 4. Environment variables (SWFVEC_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
