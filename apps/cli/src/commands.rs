//! CLI definition, tracing setup and the convert command.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use guideconverter_core::{ConvertOutcome, ProgressReporter, convert_guide};
use guideconverter_fetch::HttpFetcher;
use guideconverter_shared::{AppConfig, ConvertConfig, GuideRef, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// GuideConverter: turn OpenLiberty AsciiDoc guides into Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "guideconverter",
    version,
    about = "Convert an OpenLiberty AsciiDoc guide into Markdown.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Guide repository name, e.g. guide-rest-intro.
    pub guide: String,

    /// Branch to read the guide from.
    #[arg(default_value = "master")]
    pub branch: String,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file (defaults to ~/.guideconverter/guideconverter.toml).
    #[arg(long, env = "GUIDECONVERTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory for the converted guide.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "guideconverter=info",
        1 => "guideconverter=debug",
        _ => "guideconverter=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the conversion described by the CLI arguments.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let app_config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let config = resolve_config(&app_config, &cli);
    let guide = GuideRef::new(&cli.guide, &cli.branch);

    info!(guide = %guide.name, branch = %guide.branch, out = %config.output_dir.display(), "converting guide");

    let fetcher = HttpFetcher::new(config.timeout_secs, config.retries)?;
    let reporter = CliProgress::new();

    let outcome = convert_guide(&config, &guide, &fetcher, &reporter)
        .await
        .wrap_err_with(|| format!("failed to convert {guide}"))?;

    print_summary(&guide, &outcome);
    Ok(())
}

/// Merge CLI flags over the loaded configuration.
fn resolve_config(app_config: &AppConfig, cli: &Cli) -> ConvertConfig {
    let mut config = ConvertConfig::from(app_config);
    if let Some(out) = &cli.out {
        config.output_dir = out.clone();
    }
    config
}

fn print_summary(guide: &GuideRef, outcome: &ConvertOutcome) {
    let stats = &outcome.stats;
    println!();
    println!("  Guide converted successfully!");
    println!("  Guide:      {guide}");
    println!("  Lines:      {} -> {}", stats.input_lines, stats.output_lines);
    println!("  Directives: {}", stats.directives);
    println!("  Fragments:  {}", stats.fragments);
    println!("  Links:      {}", stats.links);
    if stats.fetch_failures > 0 {
        println!("  Failed:     {} fetches (see log)", stats.fetch_failures);
    }
    println!("  Path:       {}", outcome.path.display());
    println!("  Time:       {:.1}s", outcome.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, outcome: &ConvertOutcome) {
        self.spinner
            .finish_with_message(format!("Wrote {}", outcome.path.display()));
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_defaults_to_master() {
        let cli = Cli::try_parse_from(["guideconverter", "guide-rest-intro"]).unwrap();
        assert_eq!(cli.guide, "guide-rest-intro");
        assert_eq!(cli.branch, "master");
        assert_eq!(cli.log_format, LogFormat::Text);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "guideconverter",
            "guide-getting-started",
            "prod",
            "--log-format",
            "json",
            "-vv",
            "--out",
            "build/guides",
        ])
        .unwrap();
        assert_eq!(cli.branch, "prod");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.out, Some(PathBuf::from("build/guides")));
    }

    #[test]
    fn guide_is_required() {
        assert!(Cli::try_parse_from(["guideconverter"]).is_err());
    }

    #[test]
    fn out_flag_overrides_config() {
        let cli = Cli::try_parse_from(["guideconverter", "guide-rest-intro", "--out", "md"]).unwrap();
        let config = resolve_config(&AppConfig::default(), &cli);
        assert_eq!(config.output_dir, PathBuf::from("md"));

        let cli = Cli::try_parse_from(["guideconverter", "guide-rest-intro"]).unwrap();
        let config = resolve_config(&AppConfig::default(), &cli);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }
}
