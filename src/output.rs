//! Result types returned by the conversion entry points.

use crate::error::StageError;
use crate::pipeline::exec::ToolInvocation;
use crate::pipeline::input::ArtifactPaths;
use serde::Serialize;

/// Outcome of a conversion whose Markdown stage succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Notebook and derived artifact paths.
    pub paths: ArtifactPaths,
    /// Set when pandoc failed in lenient mode; the Markdown file still exists.
    pub pdf_error: Option<StageError>,
    pub stats: ConversionStats,
}

impl ConversionReport {
    /// True when both stages succeeded.
    pub fn is_complete(&self) -> bool {
        self.pdf_error.is_none()
    }
}

/// Timing for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    pub markdown_duration_ms: u64,
    pub pdf_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// What [`crate::convert::plan`] would run, without running it.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionPlan {
    pub paths: ArtifactPaths,
    pub markdown: ToolInvocation,
    pub pdf: ToolInvocation,
}
