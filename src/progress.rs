//! Progress-callback trait for per-stage conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to be told
//! when each external tool starts and finishes. The `nb2pdf` binary uses it
//! to drive a terminal spinner.
//!
//! # Example
//!
//! ```rust
//! use edgequake_nb2pdf::{ConversionConfig, ConversionProgressCallback, Stage};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl ConversionProgressCallback for Printer {
//!     fn on_stage_complete(&self, stage: Stage, artifact: &Path) {
//!         eprintln!("{stage} wrote {}", artifact.display());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The two pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// `jupyter nbconvert --to markdown`
    Markdown,
    /// `pandoc <md> -o <pdf>`
    Pdf,
}

impl Stage {
    /// 1-indexed position in the pipeline.
    pub fn ordinal(self) -> usize {
        match self {
            Stage::Markdown => 1,
            Stage::Pdf => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Markdown => f.write_str("notebook → markdown"),
            Stage::Pdf => f.write_str("markdown → pdf"),
        }
    }
}

/// Number of stages in a full run.
pub const STAGE_COUNT: usize = 2;

/// Called by the conversion pipeline around each external tool run.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called just before the tool for `stage` is spawned.
    ///
    /// # Arguments
    /// * `stage`   — the stage about to run
    /// * `command` — the rendered command line
    fn on_stage_start(&self, stage: Stage, command: &str) {
        let _ = (stage, command);
    }

    /// Called when the tool exits successfully.
    ///
    /// # Arguments
    /// * `stage`    — the stage that finished
    /// * `artifact` — the file the stage was expected to write
    fn on_stage_complete(&self, stage: Stage, artifact: &Path) {
        let _ = (stage, artifact);
    }

    /// Called when the tool exits non-zero or cannot be started.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }

    /// Called once after the last stage that ran.
    ///
    /// # Arguments
    /// * `stages_run`       — stages attempted (1 when stage 1 failed)
    /// * `stages_succeeded` — stages whose tool exited 0
    fn on_conversion_complete(&self, stages_run: usize, stages_succeeded: usize) {
        let _ = (stages_run, stages_succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
