//! AsciiDoc guide to Markdown conversion.
//!
//! The converter walks the guide line by line, carrying a [`Position`] from
//! one line to the next, and rewrites the handful of AsciiDoc constructs the
//! guides use: listings, tables, links, headings, file-operation directives
//! and shared boilerplate includes. Directives and includes pull remote
//! content through a [`Fetcher`]; a failed fetch is logged and skipped.

mod blocks;
mod buffer;
mod cleanup;
mod convert;
mod directive;
mod fragments;
mod links;
mod rules;
mod state;
mod table;
mod text;

use guideconverter_shared::{Fetcher, GuideRef, GuideSource, Substitutions};
use tracing::{info, instrument};

use crate::convert::Converter;

pub use state::{DirectiveKind, Position};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Counters reported after a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Lines in the source guide.
    pub input_lines: usize,
    /// Lines emitted, before serialization.
    pub output_lines: usize,
    /// File-operation directives expanded.
    pub directives: usize,
    /// Boilerplate fragments spliced in.
    pub fragments: usize,
    /// Link references rewritten.
    pub links: usize,
    /// Snippet or fragment fetches that failed.
    pub fetch_failures: usize,
}

/// Result of converting one guide.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The final Markdown document.
    pub markdown: String,
    pub stats: ConversionStats,
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Convert a guide's AsciiDoc lines to Markdown.
///
/// Never fails: fetch errors and malformed directives are logged and the
/// affected lines degrade to whatever could be produced without them.
#[instrument(skip_all, fields(guide = %guide.name, branch = %guide.branch))]
pub async fn convert<F: Fetcher>(
    lines: Vec<String>,
    guide: &GuideRef,
    source: &GuideSource,
    subs: &Substitutions,
    fetcher: &F,
) -> Conversion {
    let conversion = Converter::new(lines, guide, source, subs, fetcher)
        .run()
        .await;

    let stats = &conversion.stats;
    info!(
        input_lines = stats.input_lines,
        output_lines = stats.output_lines,
        directives = stats.directives,
        fragments = stats.fragments,
        links = stats.links,
        fetch_failures = stats.fetch_failures,
        "guide converted"
    );

    conversion
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
