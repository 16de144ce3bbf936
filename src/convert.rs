//! Conversion entry points.
//!
//! [`convert`] runs the two stages strictly in order: pandoc is only spawned
//! after nbconvert has exited successfully. [`plan`] computes the same two
//! command lines without running anything.

use crate::config::ConversionConfig;
use crate::error::Nb2PdfError;
use crate::output::{ConversionPlan, ConversionReport, ConversionStats};
use crate::pipeline::{input, markdown, pdf};
use crate::progress::{Stage, STAGE_COUNT};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Convert a notebook to Markdown, then to PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `notebook` — path to the `.ipynb` file; artifacts are written beside it
/// * `config`   — conversion configuration
///
/// # Returns
/// `Ok(ConversionReport)` once the Markdown exists, even if pandoc failed
/// (check [`ConversionReport::pdf_error`]) unless `config.strict` is set.
///
/// # Errors
/// - [`Nb2PdfError::MarkdownConversionFailed`] — nbconvert exited non-zero;
///   pandoc is never started
/// - [`Nb2PdfError::PdfConversionFailed`] — pandoc exited non-zero in strict mode
/// - [`Nb2PdfError::ToolNotFound`] / [`Nb2PdfError::SpawnFailed`] — either
///   tool could not be started
pub async fn convert(
    notebook: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Nb2PdfError> {
    let total_start = Instant::now();
    let paths = input::resolve_paths(notebook)?;
    info!("Starting conversion: {}", paths.notebook.display());

    // ── Stage 1: notebook → markdown ─────────────────────────────────────
    notify_start(config, Stage::Markdown, &markdown::invocation(&paths, config).to_string());
    let markdown_duration_ms = match markdown::run(&paths, config).await {
        Ok(ms) => {
            notify_complete(config, Stage::Markdown, &paths.markdown);
            ms
        }
        Err(e) => {
            notify_error(config, Stage::Markdown, &e.to_string());
            notify_finished(config, 1, 0);
            return Err(e);
        }
    };

    // ── Stage 2: markdown → pdf ──────────────────────────────────────────
    notify_start(config, Stage::Pdf, &pdf::invocation(&paths, config).to_string());
    let run = match pdf::run(&paths, config).await {
        Ok(run) => run,
        Err(e) => {
            notify_error(config, Stage::Pdf, &e.to_string());
            notify_finished(config, STAGE_COUNT, 1);
            return Err(e);
        }
    };

    match run.error {
        None => {
            notify_complete(config, Stage::Pdf, &paths.pdf);
            notify_finished(config, STAGE_COUNT, STAGE_COUNT);
        }
        Some(ref e) => {
            notify_error(config, Stage::Pdf, &e.to_string());
            notify_finished(config, STAGE_COUNT, 1);
        }
    }

    let stats = ConversionStats {
        markdown_duration_ms,
        pdf_duration_ms: run.duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    if let Some(e) = run.error {
        if config.strict {
            return Err(e.into());
        }
        warn!("{}", e);
        return Ok(ConversionReport {
            paths,
            pdf_error: Some(e),
            stats,
        });
    }

    info!(
        "Conversion complete: {} ({}ms total)",
        paths.pdf.display(),
        stats.total_duration_ms
    );
    Ok(ConversionReport {
        paths,
        pdf_error: None,
        stats,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    notebook: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Nb2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Nb2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(notebook, config))
}

/// Compute the paths and both command lines without running anything.
pub fn plan(
    notebook: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionPlan, Nb2PdfError> {
    let paths = input::resolve_paths(notebook)?;
    Ok(ConversionPlan {
        markdown: markdown::invocation(&paths, config),
        pdf: pdf::invocation(&paths, config),
        paths,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn notify_start(config: &ConversionConfig, stage: Stage, command: &str) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage, command);
    }
}

fn notify_complete(config: &ConversionConfig, stage: Stage, artifact: &Path) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(stage, artifact);
    }
}

fn notify_error(config: &ConversionConfig, stage: Stage, error: &str) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_error(stage, error);
    }
}

fn notify_finished(config: &ConversionConfig, run: usize, succeeded: usize) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(run, succeeded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_matches_stage_invocations() {
        let config = ConversionConfig::default();
        let p = plan("/x/y/notebook.ipynb", &config).unwrap();
        assert_eq!(p.paths.pdf, Path::new("/x/y/notebook.pdf"));
        assert_eq!(p.markdown.program, "jupyter");
        assert_eq!(p.pdf.program, "pandoc");
        assert_eq!(p.pdf.args_lossy()[0], "/x/y/notebook.md");
    }

    #[test]
    fn plan_rejects_pathless_input() {
        assert!(plan("/", &ConversionConfig::default()).is_err());
    }

    #[test]
    fn missing_jupyter_is_fatal_before_pandoc() {
        let config = ConversionConfig::builder()
            .jupyter("nb2pdf-no-such-jupyter")
            .pandoc("nb2pdf-no-such-pandoc")
            .build()
            .unwrap();
        let err = convert_sync("/tmp/nb.ipynb", &config).unwrap_err();
        assert!(
            matches!(err, Nb2PdfError::ToolNotFound { ref tool, .. } if tool == "nb2pdf-no-such-jupyter"),
            "got: {err}"
        );
    }
}
