//! Shared types, error model, and configuration for pipeverb.
//!
//! This crate is the foundation depended on by all other pipeverb crates.
//! It provides:
//! - [`PipeVerbError`] — the unified error type
//! - Pipeline definitions ([`StepSpec`], [`PipelineDef`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OutputFormat, config_dir, config_file_path, init_config,
    load_config, load_config_from, render_config,
};
pub use error::{PipeVerbError, Result};
pub use types::{PipelineDef, StepSpec};
