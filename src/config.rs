//! Configuration types for notebook-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the fixed
//! report setup exactly: the Autoyos eye-blink notebook, its nine-field
//! metadata table, `jupyter` and `pandoc` from `PATH`, and the lenient
//! PDF-failure policy.

use crate::error::Nb2PdfError;
use crate::progress::ProgressCallback;
use serde::Serialize;
use std::fmt;

/// Notebook converted when no path is given.
pub const DEFAULT_NOTEBOOK_PATH: &str =
    "/Users/karthik/Desktop/Autoyos/data_analyst_assignment/autoyos_eye_blink_analysis_karthik_dani.ipynb";

/// Cell tag stripped by nbconvert's `TagRemovePreprocessor`.
pub const DEFAULT_EXCLUDED_TAG: &str = "exclude-output";

const DEFAULT_ABSTRACT: &str = "This study investigates blinking behavior using longitudinal data \
analysis techniques. By analyzing blink durations, interblink intervals, and blink rates over \
multiple months, we uncover nuanced patterns and variations. Statistical analysis and \
visualizations reveal trends in blinking habits, shedding light on potential factors influencing \
these behaviors. This exploration offers valuable insights into the dynamics of blinking patterns.";

/// Configuration for a notebook-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_nb2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .pandoc("/opt/pandoc/bin/pandoc")
///     .metadata("date", "2024-07-01")
///     .strict(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.metadata.get("date"), Some("2024-07-01"));
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Executables invoked for the two stages.
    pub tools: ToolPaths,

    /// Ordered `--metadata` entries handed to pandoc. Default: the report table.
    pub metadata: MetadataTable,

    /// Notebook cell tags nbconvert removes. Default: `["exclude-output"]`.
    pub excluded_cell_tags: Vec<String>,

    /// Emit `remove_cell_tags=<tag>` instead of the historical
    /// `remove_cell_tags="<tag>`. Default: false.
    ///
    /// The historical form keeps a stray opening quote, which nbconvert makes
    /// part of the tag value, so tagged cells are not actually removed. It is
    /// kept as the default to reproduce the original command line exactly.
    pub fix_tag_quoting: bool,

    /// Treat a pandoc failure as fatal. Default: false.
    ///
    /// When false a failed PDF stage is recorded in
    /// [`crate::output::ConversionReport::pdf_error`] and `convert` still
    /// returns `Ok`, so the binary exits 0. When true `convert` returns
    /// [`Nb2PdfError::PdfConversionFailed`].
    pub strict: bool,

    /// Receives stage start/complete/error events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            metadata: MetadataTable::default(),
            excluded_cell_tags: vec![DEFAULT_EXCLUDED_TAG.to_string()],
            fix_tag_quoting: false,
            strict: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("tools", &self.tools)
            .field("metadata", &self.metadata)
            .field("excluded_cell_tags", &self.excluded_cell_tags)
            .field("fix_tag_quoting", &self.fix_tag_quoting)
            .field("strict", &self.strict)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn jupyter(mut self, program: impl Into<String>) -> Self {
        self.config.tools.jupyter = program.into();
        self
    }

    pub fn pandoc(mut self, program: impl Into<String>) -> Self {
        self.config.tools.pandoc = program.into();
        self
    }

    pub fn tools(mut self, tools: ToolPaths) -> Self {
        self.config.tools = tools;
        self
    }

    /// Replace the whole metadata table.
    pub fn metadata_table(mut self, table: MetadataTable) -> Self {
        self.config.metadata = table;
        self
    }

    /// Set a single metadata entry; see [`MetadataTable::set`].
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.metadata.set(key, value);
        self
    }

    pub fn excluded_cell_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.excluded_cell_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn fix_tag_quoting(mut self, v: bool) -> Self {
        self.config.fix_tag_quoting = v;
        self
    }

    pub fn strict(mut self, v: bool) -> Self {
        self.config.strict = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Nb2PdfError> {
        let c = &self.config;
        if c.tools.jupyter.trim().is_empty() {
            return Err(Nb2PdfError::InvalidConfig(
                "jupyter executable must not be empty".into(),
            ));
        }
        if c.tools.pandoc.trim().is_empty() {
            return Err(Nb2PdfError::InvalidConfig(
                "pandoc executable must not be empty".into(),
            ));
        }
        for (key, _) in c.metadata.iter() {
            // pandoc splits `--metadata=KEY=VALUE` at the first '='
            if key.is_empty() || key.contains('=') {
                return Err(Nb2PdfError::InvalidConfig(format!(
                    "metadata key must be non-empty and contain no '=', got {key:?}"
                )));
            }
        }
        if c.excluded_cell_tags.iter().any(|t| t.trim().is_empty()) {
            return Err(Nb2PdfError::InvalidConfig(
                "excluded cell tags must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Tools ────────────────────────────────────────────────────────────────

/// Program names (or paths) for the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolPaths {
    /// Runs `nbconvert`. Default: `jupyter`.
    pub jupyter: String,
    /// Renders the PDF. Default: `pandoc`.
    pub pandoc: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            jupyter: "jupyter".to_string(),
            pandoc: "pandoc".to_string(),
        }
    }
}

// ── Metadata ─────────────────────────────────────────────────────────────

/// Ordered key/value pairs passed to pandoc as `--metadata=key=value`.
///
/// A `Vec` rather than a map: pandoc receives the entries in insertion order,
/// and the order is part of the observable command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataTable(Vec<(String, String)>);

impl Default for MetadataTable {
    /// The Autoyos report table.
    fn default() -> Self {
        Self::from_pairs([
            ("title", "Autoyos: Eye Blink Data Analysis"),
            ("author", "Karthik Dani: 1BM22MD022"),
            ("date", "2024-06-26"),
            ("abstract", DEFAULT_ABSTRACT),
            (
                "subtitle",
                "Statistically Understanding Blinking Behavior across April, May and June",
            ),
            ("keywords", "Data analysis"),
            ("thanks", "*"),
            ("email", "karthikdani14@gmail.com"),
            ("institute", "BMS College of Engineering, Bangalore"),
        ])
    }
}

impl MetadataTable {
    /// An empty table.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a table from pairs; later duplicates overwrite earlier values in place.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (k, v) in pairs {
            table.set(k, v);
        }
        table
    }

    /// Insert or replace `key`. Replacing keeps the key's original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One `--metadata=key=value` argument per entry, in table order.
    pub fn to_pandoc_args(&self) -> Vec<String> {
        self.iter()
            .map(|(k, v)| format!("--metadata={k}={v}"))
            .collect()
    }
}
