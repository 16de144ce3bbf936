//! Subprocess execution shared by both stages.
//!
//! Each stage builds a [`ToolInvocation`] (pure, testable, printable for
//! `--dry-run`) and hands it to [`run`], which spawns it with
//! `tokio::process`, waits for exit and captures the tool's output. Arguments
//! go straight to `execve`; no shell is involved, so metadata values reach
//! the tool verbatim.

use crate::error::Nb2PdfError;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// A fully-specified external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    /// Executable name or path.
    pub program: String,
    /// Arguments, one element per argv slot.
    #[serde(serialize_with = "serialize_lossy")]
    pub args: Vec<OsString>,
    /// Working directory; `None` inherits ours.
    pub current_dir: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Arguments as UTF-8 strings, replacing invalid sequences.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for ToolInvocation {
    /// Render as a copy-pasteable POSIX shell command line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn serialize_lossy<S: Serializer>(args: &[OsString], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(args.iter().map(|a| a.to_string_lossy()))
}

fn shell_quote(s: &str) -> Cow<'_, str> {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if safe {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("'{}'", s.replace('\'', r"'\''")))
    }
}

/// What a finished tool left behind.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code; `None` when killed by a signal.
    pub status: Option<i32>,
    /// Whether the exit status was zero.
    pub success: bool,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    /// Wall-clock run time.
    pub duration_ms: u64,
}

/// Spawn `invocation`, wait for it to exit and collect its output.
///
/// A non-zero exit is *not* an error here; the calling stage decides what a
/// failure means. Only failing to start the process is.
///
/// # Errors
/// * [`Nb2PdfError::ToolNotFound`] — the program is not on `PATH`
///   (`hint` names the flag that overrides it)
/// * [`Nb2PdfError::SpawnFailed`] — any other OS error while starting it
pub async fn run(invocation: &ToolInvocation, hint: &'static str) -> Result<ToolOutput, Nb2PdfError> {
    debug!("Running: {}", invocation);
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    if let Some(ref dir) = invocation.current_dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Nb2PdfError::ToolNotFound {
            tool: invocation.program.clone(),
            hint,
        },
        _ => Nb2PdfError::SpawnFailed {
            tool: invocation.program.clone(),
            source: e,
        },
    })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    for line in stdout.lines().chain(stderr.lines()) {
        debug!(tool = %invocation.program, "{}", line);
    }
    debug!(
        "{} exited with {:?} after {}ms",
        invocation.program,
        output.status.code(),
        duration_ms
    );

    Ok(ToolOutput {
        status: output.status.code(),
        success: output.status.success(),
        stderr,
        duration_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_only_when_needed() {
        let inv = ToolInvocation::new("pandoc")
            .arg("/x/y/nb.md")
            .arg("-o")
            .arg("--metadata=title=Autoyos: Eye Blink Data Analysis")
            .arg("--metadata=note=it's");
        assert_eq!(
            inv.to_string(),
            "pandoc /x/y/nb.md -o '--metadata=title=Autoyos: Eye Blink Data Analysis' \
             '--metadata=note=it'\\''s'"
        );
    }

    #[test]
    fn empty_argument_is_quoted() {
        let inv = ToolInvocation::new("echo").arg("");
        assert_eq!(inv.to_string(), "echo ''");
    }

    #[test]
    fn serialises_args_as_strings() {
        let inv = ToolInvocation::new("jupyter")
            .args(["nbconvert", "--to", "markdown"])
            .current_dir("/x");
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["program"], "jupyter");
        assert_eq!(json["args"][2], "markdown");
        assert_eq!(json["current_dir"], "/x");
    }

    #[tokio::test]
    async fn missing_program_is_tool_not_found() {
        let inv = ToolInvocation::new("nb2pdf-definitely-not-installed-xyz");
        let err = run(&inv, "--jupyter").await.unwrap_err();
        assert!(matches!(err, Nb2PdfError::ToolNotFound { ref tool, .. } if tool.contains("xyz")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_status_and_stderr() {
        let inv = ToolInvocation::new("sh").args(["-c", "echo oops >&2; exit 3"]);
        let out = run(&inv, "").await.unwrap();
        assert!(!out.success);
        assert_eq!(out.status, Some(3));
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let inv = ToolInvocation::new("sh")
            .args(["-c", "touch here.txt"])
            .current_dir(dir.path());
        let out = run(&inv, "").await.unwrap();
        assert!(out.success);
        assert!(dir.path().join("here.txt").exists());
    }
}
