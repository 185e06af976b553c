//! Shared types, error model, and configuration for GuideConverter.
//!
//! This crate is the foundation depended on by all other GuideConverter crates.
//! It provides:
//! - [`GuideConverterError`], the unified error type
//! - Domain types ([`GuideRef`], [`GuideSource`]) and the [`Fetcher`] seam
//! - Configuration ([`AppConfig`], [`ConvertConfig`], config loading)
//! - The two substitution tables ([`SubstitutionTable`], [`Substitutions`])

pub mod config;
pub mod error;
pub mod fetcher;
pub mod substitutions;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConvertConfig, FetchConfig, OutputConfig, ReplacementsConfig, SourceConfig,
    config_dir, config_file_path, load_config, load_config_from,
};
pub use error::{GuideConverterError, Result};
pub use fetcher::{Fetcher, MemoryFetcher};
pub use substitutions::{SubstitutionRule, SubstitutionTable, Substitutions};
pub use types::{GuideRef, GuideSource};
