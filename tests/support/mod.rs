//! Fake `jupyter` / `pandoc` executables for the integration tests.
//!
//! Each fake records its argv (one argument per line) and working directory
//! into the sandbox, then either writes the artifact the real tool would or
//! fails with a canned stderr message.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Route library logs through the test harness; `RUST_LOG=debug` shows the
/// captured tool output of a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create an (empty) notebook file and return its path.
    ///
    /// `name` may include subdirectories, which are created.
    pub fn notebook(&self, name: &str) -> PathBuf {
        let p = self.path().join(name);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("notebook dir");
        }
        fs::write(&p, r#"{"cells": [], "nbformat": 4, "nbformat_minor": 5}"#).expect("notebook");
        p
    }

    /// nbconvert stand-in: writes `<last arg without .ipynb>.md`.
    pub fn jupyter_ok(&self) -> String {
        self.script(
            "jupyter",
            r#"nb=""
for a in "$@"; do nb="$a"; done
printf '# converted\n' > "${nb%.ipynb}.md"
echo "[NbConvertApp] Writing markdown" >&2
exit 0"#,
        )
    }

    pub fn jupyter_failing(&self) -> String {
        self.script(
            "jupyter",
            r#"echo "[NbConvertApp] WARNING | pattern matched no files" >&2
exit 1"#,
        )
    }

    /// pandoc stand-in: `$1` is the markdown, `$3` the PDF.
    pub fn pandoc_ok(&self) -> String {
        self.script(
            "pandoc",
            r#"test -f "$1" || { echo "pandoc: $1: openBinaryFile: does not exist" >&2; exit 1; }
printf '%%PDF-1.5\n' > "$3"
exit 0"#,
        )
    }

    pub fn pandoc_failing(&self) -> String {
        self.script(
            "pandoc",
            r#"echo "pdflatex not found. Please select a different --pdf-engine or install pdflatex" >&2
exit 43"#,
        )
    }

    /// Recorded argv of a fake tool, or `None` if it never ran.
    pub fn recorded_args(&self, tool: &str) -> Option<Vec<String>> {
        fs::read_to_string(self.path().join(format!("{tool}.args")))
            .ok()
            .map(|s| s.lines().map(str::to_string).collect())
    }

    pub fn recorded_cwd(&self, tool: &str) -> Option<PathBuf> {
        fs::read_to_string(self.path().join(format!("{tool}.cwd")))
            .ok()
            .map(|s| PathBuf::from(s.trim_end()))
    }

    fn script(&self, tool: &str, body: &str) -> String {
        let bin_dir = self.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("bin dir");
        let log = self.path().join(tool);
        let path = bin_dir.join(tool);
        let text = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{log}.args'\npwd > '{log}.cwd'\n{body}\n",
            log = log.display()
        );
        fs::write(&path, text).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path.to_string_lossy().into_owned()
    }
}
