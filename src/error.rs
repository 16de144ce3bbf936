//! Error types for the edgequake-nb2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Nb2PdfError`] — **Fatal**: the conversion cannot proceed at all
//!   (nbconvert failed, a tool is missing from `PATH`, bad configuration).
//!   Returned as `Err(Nb2PdfError)` from the top-level `convert*` functions.
//!
//! * [`StageError`] — **Non-fatal**: the PDF stage failed after the Markdown
//!   was produced. Stored inside [`crate::output::ConversionReport`] so the
//!   Markdown artifact is still reported and the process exits cleanly.
//!   Setting [`crate::config::ConversionConfig::strict`] promotes it to
//!   [`Nb2PdfError::PdfConversionFailed`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-nb2pdf library.
#[derive(Debug, Error)]
pub enum Nb2PdfError {
    // ── Stage errors ──────────────────────────────────────────────────────
    /// `jupyter nbconvert` exited non-zero.
    #[error("Error during Markdown conversion: `{command}` returned {}{}", status_text(.status), stderr_suffix(.stderr))]
    MarkdownConversionFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// `pandoc` exited non-zero and strict mode is on.
    #[error("Error during PDF conversion: `{command}` returned {}{}", status_text(.status), stderr_suffix(.stderr))]
    PdfConversionFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    // ── Process errors ────────────────────────────────────────────────────
    /// The tool executable could not be found.
    #[error("'{tool}' was not found on PATH.\nInstall it or point to it with {hint}.")]
    ToolNotFound { tool: String, hint: &'static str },

    /// The tool was found but the OS refused to start it.
    #[error("Failed to start '{tool}': {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    // ── Input errors ──────────────────────────────────────────────────────
    /// The notebook path has no file name to derive artifact names from.
    #[error("Invalid notebook path '{path}': no file name to derive outputs from")]
    InvalidNotebookPath { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for the PDF stage.
///
/// Stored in [`crate::output::ConversionReport::pdf_error`] when pandoc fails
/// in the default (lenient) mode.
#[derive(Debug, Clone, Error, serde::Serialize)]
pub enum StageError {
    /// `pandoc` exited non-zero.
    #[error("Error during PDF conversion: `{command}` returned {}{}", status_text(.status), stderr_suffix(.stderr))]
    PdfConversionFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl From<StageError> for Nb2PdfError {
    fn from(e: StageError) -> Self {
        match e {
            StageError::PdfConversionFailed {
                command,
                status,
                stderr,
            } => Nb2PdfError::PdfConversionFailed {
                command,
                status,
                stderr,
            },
        }
    }
}

/// Render an exit code the way shells report it.
///
/// `None` means the process was killed by a signal before it could exit.
pub fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("non-zero exit status {code}"),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

fn status_text(status: &Option<i32>) -> String {
    describe_status(*status)
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_failure_display() {
        let e = Nb2PdfError::MarkdownConversionFailed {
            command: "jupyter nbconvert --to markdown nb.ipynb".into(),
            status: Some(1),
            stderr: String::new(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Error during Markdown conversion"), "got: {msg}");
        assert!(msg.contains("non-zero exit status 1"), "got: {msg}");
        assert!(!msg.ends_with('\n'));
    }

    #[test]
    fn pdf_failure_includes_tool_stderr() {
        let e = StageError::PdfConversionFailed {
            command: "pandoc nb.md -o nb.pdf".into(),
            status: Some(43),
            stderr: "pdflatex not found. Please select a different --pdf-engine\n".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("status 43"));
        assert!(msg.contains("pdflatex not found"));
    }

    #[test]
    fn signal_termination_display() {
        assert!(describe_status(None).contains("signal"));
    }

    #[test]
    fn stage_error_promotes_to_fatal() {
        let e: Nb2PdfError = StageError::PdfConversionFailed {
            command: "pandoc".into(),
            status: Some(1),
            stderr: String::new(),
        }
        .into();
        assert!(matches!(
            e,
            Nb2PdfError::PdfConversionFailed {
                status: Some(1),
                ..
            }
        ));
    }

    #[test]
    fn tool_not_found_display() {
        let e = Nb2PdfError::ToolNotFound {
            tool: "pandoc".into(),
            hint: "--pandoc / NB2PDF_PANDOC",
        };
        assert!(e.to_string().contains("pandoc"));
        assert!(e.to_string().contains("NB2PDF_PANDOC"));
    }
}
