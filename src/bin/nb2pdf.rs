//! CLI binary for edgequake-nb2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_nb2pdf::{
    convert, plan, ConversionConfig, ConversionProgressCallback, ConversionReport, Nb2PdfError,
    ProgressCallback, Stage, DEFAULT_NOTEBOOK_PATH, STAGE_COUNT,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints the per-stage status lines and, when enabled, keeps a spinner
/// running while each external tool works.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
}

impl CliProgressCallback {
    fn new(show_spinner: bool) -> Arc<Self> {
        let bar = show_spinner.then(|| {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar })
    }

    /// Print to stdout without tearing the spinner line.
    fn say(&self, line: String) {
        match self.bar {
            Some(ref bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage, _command: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_prefix(format!("[{}/{}]", stage.ordinal(), STAGE_COUNT));
            bar.set_message(stage.to_string());
        }
    }

    fn on_stage_complete(&self, stage: Stage, artifact: &Path) {
        let line = match stage {
            Stage::Markdown => format!("Converted notebook to Markdown: {}", artifact.display()),
            Stage::Pdf => format!(
                "Successfully converted Markdown to PDF: {}",
                artifact.display()
            ),
        };
        self.say(format!("{} {}", green("✓"), line));
    }

    fn on_conversion_complete(&self, _stages_run: usize, _stages_succeeded: usize) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for CliProgressCallback {
    fn drop(&mut self) {
        if let Some(ref bar) = self.bar {
            if !bar.is_finished() {
                bar.finish_and_clear();
            }
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the built-in Autoyos report notebook
  nb2pdf

  # Convert another notebook (outputs land next to it)
  nb2pdf ~/work/analysis.ipynb

  # Show the two commands without running them
  nb2pdf --dry-run analysis.ipynb

  # Fail with exit code 1 when pandoc fails, too
  nb2pdf --strict analysis.ipynb

  # Machine-readable report
  nb2pdf --json analysis.ipynb > report.json

  # Really strip cells tagged exclude-output
  nb2pdf --fix-tag-quoting analysis.ipynb

REQUIREMENTS:
  jupyter (with nbconvert) and pandoc on PATH, plus a LaTeX engine for pandoc's
  PDF output (pdflatex by default).

EXIT STATUS:
  0  Markdown produced; PDF produced, or pandoc failed without --strict
  1  nbconvert failed, a tool could not be started, or pandoc failed with --strict

ENVIRONMENT VARIABLES:
  NB2PDF_JUPYTER   jupyter executable
  NB2PDF_PANDOC    pandoc executable
  NB2PDF_FIX_TAG_QUOTING  drop the stray quote from remove_cell_tags
  RUST_LOG         Override the log filter (e.g. edgequake_nb2pdf=debug)
"#;

/// Convert a Jupyter notebook to PDF via nbconvert and pandoc.
#[derive(Parser, Debug)]
#[command(
    name = "nb2pdf",
    version,
    about = "Convert a Jupyter notebook to PDF via nbconvert and pandoc",
    long_about = "Convert a Jupyter notebook to Markdown with `jupyter nbconvert` (dropping cells \
tagged exclude-output), then to PDF with `pandoc`, attaching the report's title, author, abstract \
and other metadata. Both files are written next to the notebook.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Notebook to convert.
    #[arg(env = "NB2PDF_NOTEBOOK", default_value = DEFAULT_NOTEBOOK_PATH)]
    notebook: PathBuf,

    /// jupyter executable used for `nbconvert`.
    #[arg(long, env = "NB2PDF_JUPYTER", default_value = "jupyter")]
    jupyter: String,

    /// pandoc executable.
    #[arg(long, env = "NB2PDF_PANDOC", default_value = "pandoc")]
    pandoc: String,

    /// Pass `remove_cell_tags=<tag>` without the historical stray quote, so
    /// cells tagged `exclude-output` are really removed.
    #[arg(long, env = "NB2PDF_FIX_TAG_QUOTING")]
    fix_tag_quoting: bool,

    /// Exit with status 1 when the PDF stage fails as well.
    #[arg(long, env = "NB2PDF_STRICT")]
    strict: bool,

    /// Print the commands that would run, then exit.
    #[arg(long)]
    dry_run: bool,

    /// Output a JSON report (or plan with --dry-run) instead of status lines.
    #[arg(long, env = "NB2PDF_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "NB2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs, including the tools' own output.
    #[arg(short, long, env = "NB2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NB2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner and status lines cover INFO-level events, so the library
    // only logs errors unless asked for more.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.dry_run;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if cli.quiet || cli.json {
        None
    } else {
        // Spinner redraws would interleave with DEBUG tool output.
        let cb = CliProgressCallback::new(show_progress && !cli.verbose);
        Some(cb as Arc<dyn ConversionProgressCallback>)
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Dry run ──────────────────────────────────────────────────────────
    if cli.dry_run {
        let plan = plan(&cli.notebook, &config).context("Failed to plan conversion")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan).context("Failed to serialise plan")?
            );
        } else {
            println!("{}", plan.markdown);
            println!("{}", plan.pdf);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Run conversion ───────────────────────────────────────────────────
    match convert(&cli.notebook, &config).await {
        Ok(report) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialise report")?
                );
            }
            report_outcome(&cli, &report);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_failure(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .jupyter(&cli.jupyter)
        .pandoc(&cli.pandoc)
        .fix_tag_quoting(cli.fix_tag_quoting)
        .strict(cli.strict);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Summarise a run that produced at least the Markdown file.
fn report_outcome(cli: &Cli, report: &ConversionReport) {
    if let Some(ref e) = report.pdf_error {
        // Lenient mode: the failure is reported but the exit status stays 0.
        eprintln!("{} {}", red("✗"), red(&e.to_string()));
        return;
    }
    if !cli.quiet && !cli.json {
        eprintln!(
            "{}",
            dim(&format!(
                "   nbconvert {}ms  /  pandoc {}ms  —  {}ms total",
                report.stats.markdown_duration_ms,
                report.stats.pdf_duration_ms,
                report.stats.total_duration_ms
            ))
        );
    }
}

fn print_failure(e: &Nb2PdfError) {
    eprintln!("{} {}", red("✘"), bold(&e.to_string()));
}
