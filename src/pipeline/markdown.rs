//! Stage 1: notebook → Markdown via `jupyter nbconvert`.
//!
//! nbconvert writes `<stem>.md` (plus a `<stem>_files/` directory for
//! figures) next to the notebook. Cells carrying any of the configured tags
//! are dropped by the `TagRemovePreprocessor`. A failure here is always
//! fatal: there is nothing for pandoc to convert.

use crate::config::ConversionConfig;
use crate::error::Nb2PdfError;
use crate::pipeline::exec::{self, ToolInvocation};
use crate::pipeline::input::ArtifactPaths;
use tracing::{info, warn};

/// Build the nbconvert command line.
///
/// ```text
/// jupyter nbconvert --to markdown --TagRemovePreprocessor.enabled=True
///     --TagRemovePreprocessor.remove_cell_tags="<tag> ... <notebook>
/// ```
///
/// The unbalanced `"` is reproduced verbatim unless
/// [`ConversionConfig::fix_tag_quoting`] is set.
pub fn invocation(paths: &ArtifactPaths, config: &ConversionConfig) -> ToolInvocation {
    ToolInvocation::new(&config.tools.jupyter)
        .args(["nbconvert", "--to", "markdown"])
        .arg("--TagRemovePreprocessor.enabled=True")
        .args(
            config
                .excluded_cell_tags
                .iter()
                .map(|tag| remove_cell_tags_arg(tag, config.fix_tag_quoting)),
        )
        .arg(&paths.notebook)
}

fn remove_cell_tags_arg(tag: &str, fixed: bool) -> String {
    if fixed {
        format!("--TagRemovePreprocessor.remove_cell_tags={tag}")
    } else {
        format!("--TagRemovePreprocessor.remove_cell_tags=\"{tag}")
    }
}

/// Run nbconvert and return its run time in milliseconds.
///
/// # Errors
/// [`Nb2PdfError::MarkdownConversionFailed`] on a non-zero exit, or the
/// spawn errors of [`exec::run`].
pub async fn run(paths: &ArtifactPaths, config: &ConversionConfig) -> Result<u64, Nb2PdfError> {
    let inv = invocation(paths, config);
    info!("Converting notebook to Markdown: {}", paths.notebook.display());

    let out = exec::run(&inv, "--jupyter / NB2PDF_JUPYTER").await?;
    if !out.success {
        return Err(Nb2PdfError::MarkdownConversionFailed {
            command: inv.to_string(),
            status: out.status,
            stderr: out.stderr,
        });
    }

    if !tokio::fs::try_exists(&paths.markdown).await.unwrap_or(false) {
        warn!(
            "nbconvert succeeded but {} does not exist; pandoc will likely fail",
            paths.markdown.display()
        );
    }
    info!(
        "Converted notebook to Markdown: {} ({}ms)",
        paths.markdown.display(),
        out.duration_ms
    );
    Ok(out.duration_ms)
}
