//! Pipeline stages for notebook-to-PDF conversion.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ markdown ──▶ pdf
//! (paths)   (nbconvert)  (pandoc)
//! ```
//!
//! 1. [`input`]    — derive the `.md` and `.pdf` paths from the notebook path
//! 2. [`markdown`] — run `jupyter nbconvert --to markdown`; failure is fatal
//! 3. [`pdf`]      — run `pandoc` with the metadata table; failure is
//!    reported, fatal only in strict mode
//!
//! [`exec`] holds the subprocess plumbing both tool stages share.

pub mod exec;
pub mod input;
pub mod markdown;
pub mod pdf;
