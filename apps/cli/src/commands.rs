//! CLI definition, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use macrofind_core::document::default_findings_path;
use macrofind_core::pipeline::{EnrichConfig, ProgressReporter, enrich_file};
use macrofind_core::summary::EnrichSummary;
use macrofind_search::build_searcher;
use macrofind_shared::{
    AppConfig, SearchProvider, init_config, load_config, load_config_from, resolve_api_key,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// MacroFind — enrich a monthly findings document with web search results.
#[derive(Parser)]
#[command(
    name = "macrofind",
    version,
    about = "Append new web-search findings to a monthly macro findings document.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the findings JSON file.
    pub path: Option<PathBuf>,

    /// Year of the default findings file (used when PATH is omitted).
    #[arg(long, requires = "month", conflicts_with = "path")]
    pub year: Option<i32>,

    /// Month of the default findings file (used when PATH is omitted).
    #[arg(long, requires = "year", conflicts_with = "path")]
    pub month: Option<u32>,

    /// Config file (defaults to ~/.macrofind/macrofind.toml).
    #[arg(long, env = "MACROFIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Search provider: serper or google-html.
    #[arg(long)]
    pub provider: Option<String>,

    /// Results requested per query.
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Run the searches and report, but do not write the file.
    #[arg(long)]
    pub dry_run: bool,

    /// Write a default config file and exit.
    #[arg(long, exclusive = true)]
    pub init_config: bool,

    /// Print the resolved configuration and exit.
    #[arg(long)]
    pub show_config: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// only the summary.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "macrofind=info",
        1 => "macrofind=debug",
        _ => "macrofind=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if cli.init_config {
        let path = init_config()?;
        println!("Config initialized at: {}", path.display());
        return Ok(());
    }

    let config = resolve_config(&cli)?;

    if cli.show_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = match (&cli.path, cli.year, cli.month) {
        (Some(path), _, _) => path.clone(),
        (None, Some(year), Some(month)) => default_findings_path(year, month),
        _ => return Err(eyre!("missing findings file: pass PATH or --year and --month")),
    };

    cmd_enrich(&path, &config, cli.dry_run).await
}

/// Load the config file and apply CLI overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(provider) = &cli.provider {
        config.search.provider = provider.parse::<SearchProvider>()?;
    }
    if let Some(max) = cli.max_results {
        config.search.max_results = max;
    }

    config.validate()?;
    Ok(config)
}

async fn cmd_enrich(path: &Path, config: &AppConfig, dry_run: bool) -> Result<()> {
    let api_key = resolve_api_key(&config.search)?;
    let searcher = build_searcher(&config.search, api_key)?;

    let enrich_config = EnrichConfig {
        path: path.to_path_buf(),
        max_results: config.search.max_results,
        dry_run,
    };

    info!(
        path = %path.display(),
        provider = ?config.search.provider,
        max_results = config.search.max_results,
        dry_run,
        "enriching findings document"
    );

    let reporter = CliProgress::new();
    let result = enrich_file(&enrich_config, searcher.as_ref(), &reporter).await?;
    let summary = &result.summary;

    // Print summary
    println!();
    if result.written {
        println!("  Findings document updated: {}", result.path.display());
    } else {
        println!("  Dry run, not written: {}", result.path.display());
    }
    println!("{summary}");
    if summary.queries_failed > 0 {
        println!(
            "  ({} of {} queries failed)",
            summary.queries_failed, summary.queries_run
        );
    }
    println!("  Time: {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
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

    fn query_finished(&self, query: &str, current: usize, total: usize, hits: usize) {
        self.spinner
            .set_message(format!("Searching [{current}/{total}] {query} ({hits} hits)"));
    }

    fn done(&self, _summary: &EnrichSummary) {
        self.spinner.finish_and_clear();
    }
}
