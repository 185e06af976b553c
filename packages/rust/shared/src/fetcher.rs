//! The remote text retrieval seam.
//!
//! The converter only needs "give me the lines at this URL". The HTTP
//! implementation lives in `guideconverter-fetch`; [`MemoryFetcher`] serves
//! fixed documents for tests and offline runs.

use std::collections::HashMap;
use std::future::Future;

use crate::error::{GuideConverterError, Result};

/// Retrieves a remote text resource as a sequence of lines.
///
/// Implementations return [`GuideConverterError::NotFound`] for a missing
/// resource and [`GuideConverterError::Network`] for everything else.
///
/// [`GuideConverterError::NotFound`]: crate::GuideConverterError::NotFound
/// [`GuideConverterError::Network`]: crate::GuideConverterError::Network
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and split the body into lines (terminators removed).
    fn fetch_lines(&self, url: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

// ---------------------------------------------------------------------------
// MemoryFetcher
// ---------------------------------------------------------------------------

/// Serves fixed documents from memory; any other URL is `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<S: AsRef<str>>(mut self, url: impl Into<String>, lines: &[S]) -> Self {
        self.insert(url, lines);
        self
    }

    pub fn insert<S: AsRef<str>>(&mut self, url: impl Into<String>, lines: &[S]) {
        let lines = lines.iter().map(|line| line.as_ref().to_string()).collect();
        self.files.insert(url.into(), lines);
    }
}

impl Fetcher for MemoryFetcher {
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>> {
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| GuideConverterError::NotFound {
                url: url.to_string(),
            })
    }
}
