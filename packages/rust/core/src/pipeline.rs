//! End-to-end `convert` pipeline: README → substitution tables → convert → file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use guideconverter_markdown::ConversionStats;
use guideconverter_shared::{
    ConvertConfig, Fetcher, GuideConverterError, GuideRef, Result, Substitutions,
};

/// Result of converting one guide.
#[derive(Debug)]
pub struct ConvertOutcome {
    /// Path of the written Markdown file.
    pub path: PathBuf,
    /// Conversion counters.
    pub stats: ConversionStats,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, outcome: &ConvertOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _outcome: &ConvertOutcome) {}
}

/// Run the full conversion for one guide.
///
/// 1. Fetch `README.adoc` (fatal on failure)
/// 2. Load the substitution tables
/// 3. Convert to Markdown
/// 4. Write `<out>/<guide>.md`
#[instrument(skip_all, fields(guide = %guide.name, branch = %guide.branch))]
pub async fn convert_guide<F: Fetcher>(
    config: &ConvertConfig,
    guide: &GuideRef,
    fetcher: &F,
    progress: &dyn ProgressReporter,
) -> Result<ConvertOutcome> {
    let start = Instant::now();

    guide.validate()?;
    config.source.validate(guide)?;

    info!(guide = %guide.name, branch = %guide.branch, "starting conversion");

    // --- Phase 1: Source document ---
    progress.phase("Fetching guide");
    let readme_url = config.source.readme_url(guide);
    let lines = fetcher.fetch_lines(&readme_url).await?;
    info!(url = %readme_url, lines = lines.len(), "guide fetched");

    // --- Phase 2: Substitution tables ---
    progress.phase("Loading substitution tables");
    let subs = Substitutions::load(&config.loop_file, &config.heading_file)?;

    // --- Phase 3: Convert ---
    progress.phase("Converting to Markdown");
    let conversion =
        guideconverter_markdown::convert(lines, guide, &config.source, &subs, fetcher).await;

    // --- Phase 4: Write ---
    progress.phase("Writing output");
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| GuideConverterError::io(&config.output_dir, e))?;
    let path = config.output_dir.join(guide.output_file_name());
    std::fs::write(&path, &conversion.markdown).map_err(|e| GuideConverterError::io(&path, e))?;

    let outcome = ConvertOutcome {
        path,
        stats: conversion.stats,
        elapsed: start.elapsed(),
    };

    info!(
        path = %outcome.path.display(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "conversion complete"
    );
    progress.done(&outcome);

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use guideconverter_shared::{GuideSource, MemoryFetcher};

    const BASE: &str = "http://guides.test";

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            if let Ok(mut phases) = self.phases.lock() {
                phases.push(name.to_string());
            }
        }
        fn done(&self, _outcome: &ConvertOutcome) {
            if let Ok(mut phases) = self.phases.lock() {
                phases.push("done".to_string());
            }
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "guideconverter-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn config(out: PathBuf) -> ConvertConfig {
        ConvertConfig {
            source: GuideSource::with_base(BASE, "openliberty"),
            output_dir: out.clone(),
            loop_file: out.join("missing-loop.toml"),
            heading_file: out.join("missing-heading.toml"),
            timeout_secs: 5,
            retries: 0,
        }
    }

    #[tokio::test]
    async fn writes_converted_guide() {
        let out = temp_dir("writes");
        let config = config(out.join("out"));
        let guide = GuideRef::new("guide-rest-intro", "master");

        let fetcher = MemoryFetcher::new()
            .with(
                config.source.readme_url(&guide),
                &[
                    ":projectid: rest-intro",
                    "= Creating a RESTful web service",
                    "== What you'll learn",
                    "#Create `pom.xml`",
                    "Done.",
                ],
            )
            .with(config.source.snippet_url(&guide, "pom.xml"), &["<project/>"]);

        let progress = RecordingProgress::default();
        let outcome = convert_guide(&config, &guide, &fetcher, &progress)
            .await
            .unwrap();

        assert_eq!(outcome.path, config.output_dir.join("guide-rest-intro.md"));
        let written = std::fs::read_to_string(&outcome.path).unwrap();
        assert!(written.starts_with("# Creating a RESTful web service\n"));
        assert!(written.contains("> [File -> Open]guide-rest-intro/start/pom.xml"));
        assert!(written.contains("<project/>"));
        assert!(written.ends_with("Done.\n"));

        assert_eq!(outcome.stats.directives, 1);
        assert_eq!(outcome.stats.fetch_failures, 0);
        assert_eq!(
            progress.phases.lock().unwrap().last().map(String::as_str),
            Some("done")
        );

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn missing_readme_is_fatal() {
        let out = temp_dir("missing");
        let config = config(out.clone());
        let guide = GuideRef::new("guide-nope", "main");

        let err = convert_guide(&config, &guide, &MemoryFetcher::new(), &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, GuideConverterError::NotFound { .. }));
        assert!(!out.join("guide-nope.md").exists());
    }

    #[tokio::test]
    async fn invalid_guide_rejected_before_fetch() {
        let config = config(temp_dir("invalid"));
        let guide = GuideRef::new("", "master");

        let err = convert_guide(&config, &guide, &MemoryFetcher::new(), &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, GuideConverterError::Validation { .. }));
    }

    #[tokio::test]
    async fn invalid_loop_table_is_fatal() {
        let out = temp_dir("badtable");
        std::fs::create_dir_all(&out).unwrap();
        let mut config = config(out.join("out"));
        config.loop_file = out.join("loop.toml");
        std::fs::write(&config.loop_file, "[[rule]]\npattern = \"(unclosed\"\n").unwrap();

        let guide = GuideRef::new("guide-rest-intro", "master");
        let fetcher =
            MemoryFetcher::new().with(config.source.readme_url(&guide), &["= Title"]);

        let err = convert_guide(&config, &guide, &fetcher, &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, GuideConverterError::Config { .. }));
        let _ = std::fs::remove_dir_all(&out);
    }
}
