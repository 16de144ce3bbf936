//! Input resolution: derive every artifact path from the notebook path.
//!
//! nbconvert writes `<stem>.md` next to the notebook, and pandoc is told to
//! write `<stem>.pdf` beside it. Both names come from [`Path::file_stem`], so
//! only the final extension is stripped (`report.v2.ipynb` → `report.v2.md`),
//! which is the name nbconvert actually produces. This deliberately differs
//! from splitting at the first dot (`report.v2.ipynb` → `report`): for
//! multi-dot names that split would point pandoc at a file nbconvert never
//! wrote.
//!
//! Nothing here touches the filesystem: a missing notebook is reported by
//! nbconvert itself.

use crate::error::Nb2PdfError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The notebook and the files derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    /// Input notebook, as given.
    pub notebook: PathBuf,
    /// File name without its final extension.
    pub base_name: String,
    /// `<dir>/<base>.md`, written by nbconvert.
    pub markdown: PathBuf,
    /// `<dir>/<base>.pdf`, written by pandoc.
    pub pdf: PathBuf,
}

impl ArtifactPaths {
    /// Directory holding the notebook and its artifacts.
    ///
    /// Empty for a bare file name, which callers treat as the current directory.
    pub fn dir(&self) -> &Path {
        self.notebook.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Derive [`ArtifactPaths`] for `notebook`.
///
/// # Errors
/// [`Nb2PdfError::InvalidNotebookPath`] when the path has no file name
/// (e.g. `/` or `..`).
pub fn resolve_paths(notebook: impl AsRef<Path>) -> Result<ArtifactPaths, Nb2PdfError> {
    let notebook = notebook.as_ref();
    let base_name = notebook
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Nb2PdfError::InvalidNotebookPath {
            path: notebook.to_path_buf(),
        })?;

    let dir = notebook.parent().unwrap_or_else(|| Path::new(""));
    let paths = ArtifactPaths {
        notebook: notebook.to_path_buf(),
        markdown: dir.join(format!("{base_name}.md")),
        pdf: dir.join(format!("{base_name}.pdf")),
        base_name,
    };

    debug!(
        "Resolved artifacts for {}: {} / {}",
        paths.notebook.display(),
        paths.markdown.display(),
        paths.pdf.display()
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_siblings_of_notebook() {
        let p = resolve_paths("/x/y/notebook.ipynb").unwrap();
        assert_eq!(p.base_name, "notebook");
        assert_eq!(p.markdown, PathBuf::from("/x/y/notebook.md"));
        assert_eq!(p.pdf, PathBuf::from("/x/y/notebook.pdf"));
        assert_eq!(p.dir(), Path::new("/x/y"));
    }

    #[test]
    fn renaming_notebook_renames_both_outputs() {
        let a = resolve_paths("/x/y/first.ipynb").unwrap();
        let b = resolve_paths("/x/y/second.ipynb").unwrap();
        assert_eq!(a.dir(), b.dir());
        assert_eq!(b.markdown, PathBuf::from("/x/y/second.md"));
        assert_eq!(b.pdf, PathBuf::from("/x/y/second.pdf"));
    }

    #[test]
    fn only_final_extension_is_stripped() {
        let p = resolve_paths("/data/report.v2.ipynb").unwrap();
        assert_eq!(p.base_name, "report.v2");
        assert_eq!(p.markdown, PathBuf::from("/data/report.v2.md"));
    }

    #[test]
    fn bare_file_name_stays_relative() {
        let p = resolve_paths("analysis.ipynb").unwrap();
        assert_eq!(p.markdown, PathBuf::from("analysis.md"));
        assert_eq!(p.dir(), Path::new(""));
    }

    #[test]
    fn default_notebook_resolves() {
        let p = resolve_paths(crate::config::DEFAULT_NOTEBOOK_PATH).unwrap();
        assert_eq!(p.base_name, "autoyos_eye_blink_analysis_karthik_dani");
        assert!(p.pdf.ends_with("autoyos_eye_blink_analysis_karthik_dani.pdf"));
    }

    #[test]
    fn root_is_rejected() {
        assert!(matches!(
            resolve_paths("/"),
            Err(Nb2PdfError::InvalidNotebookPath { .. })
        ));
    }
}
