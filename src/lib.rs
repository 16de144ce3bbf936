//! # edgequake-nb2pdf
//!
//! Convert a Jupyter notebook to a PDF report by driving two external tools:
//! `jupyter nbconvert` renders the notebook to Markdown, then `pandoc` turns
//! that Markdown into a PDF with a title block built from a metadata table.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notebook.ipynb
//!  │
//!  ├─ 1. Input     derive notebook.md / notebook.pdf beside the notebook
//!  ├─ 2. Markdown  jupyter nbconvert --to markdown (tagged cells removed)
//!  └─ 3. PDF       pandoc notebook.md -o notebook.pdf --metadata=key=value …
//! ```
//!
//! A failed Markdown stage aborts the run. A failed PDF stage is reported in
//! [`ConversionReport::pdf_error`] and the run still succeeds, unless
//! [`ConversionConfig::strict`] is set.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_nb2pdf::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .metadata("date", "2024-07-01")
//!         .build()?;
//!     let report = convert("analysis.ipynb", &config).await?;
//!     match report.pdf_error {
//!         None => println!("{}", report.paths.pdf.display()),
//!         Some(e) => eprintln!("{e}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `nb2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, MetadataTable, ToolPaths, DEFAULT_EXCLUDED_TAG,
    DEFAULT_NOTEBOOK_PATH,
};
pub use convert::{convert, convert_sync, plan};
pub use error::{Nb2PdfError, StageError};
pub use output::{ConversionPlan, ConversionReport, ConversionStats};
pub use pipeline::exec::ToolInvocation;
pub use pipeline::input::{resolve_paths, ArtifactPaths};
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, ProgressCallback, Stage, STAGE_COUNT,
};
