//! Stage 2: Markdown → PDF via `pandoc`.
//!
//! Each metadata entry becomes its own `--metadata=key=value` argv element,
//! in table order. pandoc runs inside the notebook's directory so the
//! relative figure links nbconvert wrote (`<stem>_files/...`) resolve; the
//! markdown and PDF paths are made absolute first, otherwise a relative
//! notebook path would be resolved against that directory a second time.
//!
//! Unlike stage 1, a pandoc failure is returned as a [`StageError`] and the
//! caller decides whether it is fatal.

use crate::config::ConversionConfig;
use crate::error::{Nb2PdfError, StageError};
use crate::pipeline::exec::{self, ToolInvocation};
use crate::pipeline::input::ArtifactPaths;
use tracing::info;

/// Build the pandoc command line.
///
/// ```text
/// pandoc <markdown> -o <pdf> --metadata=title=... --metadata=author=... ...
/// ```
pub fn invocation(paths: &ArtifactPaths, config: &ConversionConfig) -> ToolInvocation {
    let dir = paths.dir();
    let workdir = if dir.as_os_str().is_empty() {
        None
    } else {
        std::path::absolute(dir).ok()
    };

    let (markdown, pdf) = match &workdir {
        Some(abs) => (
            abs.join(format!("{}.md", paths.base_name)),
            abs.join(format!("{}.pdf", paths.base_name)),
        ),
        None => (paths.markdown.clone(), paths.pdf.clone()),
    };

    let inv = ToolInvocation::new(&config.tools.pandoc)
        .arg(markdown)
        .arg("-o")
        .arg(pdf)
        .args(config.metadata.to_pandoc_args());

    match workdir {
        Some(abs) => inv.current_dir(abs),
        None => inv,
    }
}

/// Outcome of a pandoc run that managed to start.
#[derive(Debug)]
pub struct PdfRun {
    pub duration_ms: u64,
    /// `Some` when pandoc exited non-zero.
    pub error: Option<StageError>,
}

/// Run pandoc.
///
/// # Errors
/// Only the spawn errors of [`exec::run`]; a non-zero exit is reported in
/// [`PdfRun::error`].
pub async fn run(paths: &ArtifactPaths, config: &ConversionConfig) -> Result<PdfRun, Nb2PdfError> {
    let inv = invocation(paths, config);
    info!("Converting Markdown to PDF: {}", paths.markdown.display());

    let out = exec::run(&inv, "--pandoc / NB2PDF_PANDOC").await?;
    let error = if out.success {
        info!(
            "Successfully converted Markdown to PDF: {} ({}ms)",
            paths.pdf.display(),
            out.duration_ms
        );
        None
    } else {
        Some(StageError::PdfConversionFailed {
            command: inv.to_string(),
            status: out.status,
            stderr: out.stderr,
        })
    };

    Ok(PdfRun {
        duration_ms: out.duration_ms,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetadataTable;
    use crate::pipeline::input::resolve_paths;
    use std::path::PathBuf;

    #[test]
    fn default_command_line() {
        let paths = resolve_paths("/x/y/notebook.ipynb").unwrap();
        let inv = invocation(&paths, &ConversionConfig::default());
        let args = inv.args_lossy();

        assert_eq!(inv.program, "pandoc");
        assert_eq!(&args[..3], ["/x/y/notebook.md", "-o", "/x/y/notebook.pdf"]);
        assert_eq!(args.len(), 3 + 9);
        assert_eq!(args[3], "--metadata=title=Autoyos: Eye Blink Data Analysis");
        assert_eq!(args[4], "--metadata=author=Karthik Dani: 1BM22MD022");
        assert_eq!(args[5], "--metadata=date=2024-06-26");
        assert_eq!(
            args[11],
            "--metadata=institute=BMS College of Engineering, Bangalore"
        );
        assert_eq!(inv.current_dir, Some(PathBuf::from("/x/y")));
    }

    #[test]
    fn metadata_follows_table_order() {
        let config = ConversionConfig::builder()
            .metadata_table(MetadataTable::from_pairs([("z", "1"), ("a", "2 = two")]))
            .build()
            .unwrap();
        let paths = resolve_paths("nb.ipynb").unwrap();
        let inv = invocation(&paths, &config);
        assert_eq!(
            inv.args_lossy(),
            vec!["nb.md", "-o", "nb.pdf", "--metadata=z=1", "--metadata=a=2 = two"]
        );
        assert!(inv.current_dir.is_none());
    }

    #[test]
    fn relative_notebook_paths_are_anchored_to_the_working_dir() {
        let paths = resolve_paths("sub/nb.ipynb").unwrap();
        let inv = invocation(&paths, &ConversionConfig::default());
        let args = inv.args_lossy();
        let cwd = inv.current_dir.clone().expect("pandoc runs in the notebook dir");

        assert!(cwd.is_absolute());
        assert!(cwd.ends_with("sub"));
        assert_eq!(PathBuf::from(&args[0]), cwd.join("nb.md"));
        assert_eq!(args[1], "-o");
        assert_eq!(PathBuf::from(&args[2]), cwd.join("nb.pdf"));
        assert!(!args[0].contains("sub/sub"));
    }
}
