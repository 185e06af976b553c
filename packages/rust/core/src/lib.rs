//! Core pipeline orchestration for GuideConverter.
//!
//! This crate ties together fetching, the substitution tables and markdown
//! conversion into the end-to-end `convert_guide` workflow.

pub mod pipeline;

pub use pipeline::{ConvertOutcome, ProgressReporter, SilentProgress, convert_guide};
