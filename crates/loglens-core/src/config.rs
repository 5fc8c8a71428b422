//! Analyzer configuration
//!
//! Loaded from an optional TOML file; command-line flags are applied on top
//! with the `with_*` builders. Every key is optional:
//!
//! ```toml
//! encoding = "gbk"
//! max_errors = 5
//! context_before = 2
//! context_after = 20
//! tail_lines = 50
//! search_context = 2
//! max_matches = 10
//! ```

use crate::error::{DiagnoseError, DiagnoseResult};
use crate::report::ReportShape;
use crate::scanner::ScanParams;
use crate::search::SearchParams;
use serde::Deserialize;
use std::path::Path;

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Explicit encoding label; detection is skipped when set
    pub encoding: Option<String>,
    /// Maximum errors captured per report
    pub max_errors: usize,
    /// Leading context lines; unset means the report shape's default
    pub context_before: Option<usize>,
    /// Trailing context lines
    pub context_after: usize,
    /// Tail excerpt length when nothing matched (0 disables)
    pub tail_lines: usize,
    /// Symmetric context around search hits
    pub search_context: usize,
    /// Maximum search hits captured
    pub max_matches: usize,
}

impl AnalyzerConfig {
    /// Default tail excerpt length
    pub const DEFAULT_TAIL_LINES: usize = 50;
    /// Default search context
    pub const DEFAULT_SEARCH_CONTEXT: usize = 2;
    /// Default search hit cap
    pub const DEFAULT_MAX_MATCHES: usize = 10;

    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str, origin: &Path) -> DiagnoseResult<Self> {
        toml::from_str(text).map_err(|e| DiagnoseError::config(origin, e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> DiagnoseResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DiagnoseError::config(path, e.to_string()))?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// With explicit encoding label
    #[inline]
    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// With error cap
    #[inline]
    #[must_use]
    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = max;
        self
    }

    /// With leading context
    #[inline]
    #[must_use]
    pub fn with_context_before(mut self, lines: usize) -> Self {
        self.context_before = Some(lines);
        self
    }

    /// With trailing context
    #[inline]
    #[must_use]
    pub fn with_context_after(mut self, lines: usize) -> Self {
        self.context_after = lines;
        self
    }

    /// With tail excerpt length
    #[inline]
    #[must_use]
    pub fn with_tail_lines(mut self, lines: usize) -> Self {
        self.tail_lines = lines;
        self
    }

    /// With search context
    #[inline]
    #[must_use]
    pub fn with_search_context(mut self, lines: usize) -> Self {
        self.search_context = lines;
        self
    }

    /// With search hit cap
    #[inline]
    #[must_use]
    pub fn with_max_matches(mut self, max: usize) -> Self {
        self.max_matches = max;
        self
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> DiagnoseResult<()> {
        if self.max_errors == 0 {
            return Err(DiagnoseError::invalid_parameter("max_errors must be at least 1"));
        }
        if self.max_matches == 0 {
            return Err(DiagnoseError::invalid_parameter("max_matches must be at least 1"));
        }
        if matches!(&self.encoding, Some(label) if label.trim().is_empty()) {
            return Err(DiagnoseError::invalid_parameter("encoding label is empty"));
        }
        Ok(())
    }

    /// Scan parameters for a report shape
    #[must_use]
    pub fn scan_params(&self, shape: ReportShape) -> ScanParams {
        ScanParams::new(
            self.max_errors,
            self.context_before
                .unwrap_or_else(|| shape.default_context_before()),
            self.context_after,
        )
    }

    /// Search parameters
    #[must_use]
    pub fn search_params(&self) -> SearchParams {
        SearchParams::new(self.search_context, self.max_matches)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            encoding: None,
            max_errors: ScanParams::DEFAULT_MAX_ERRORS,
            context_before: None,
            context_after: ScanParams::DEFAULT_CONTEXT_AFTER,
            tail_lines: Self::DEFAULT_TAIL_LINES,
            search_context: Self::DEFAULT_SEARCH_CONTEXT,
            max_matches: Self::DEFAULT_MAX_MATCHES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.max_errors, 5);
        assert_eq!(config.context_after, 20);
        assert_eq!(config.tail_lines, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn shape_decides_leading_context() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.scan_params(ReportShape::Detailed).context_before, 0);
        assert_eq!(config.scan_params(ReportShape::BugReport).context_before, 2);

        let config = config.with_context_before(7);
        assert_eq!(config.scan_params(ReportShape::Detailed).context_before, 7);
        assert_eq!(config.scan_params(ReportShape::BugReport).context_before, 7);
    }

    #[test]
    fn partial_toml() {
        let text = "max_errors = 3\nencoding = \"gbk\"\n";
        let config = AnalyzerConfig::from_toml_str(text, Path::new("x.toml")).unwrap();
        assert_eq!(config.max_errors, 3);
        assert_eq!(config.encoding.as_deref(), Some("gbk"));
        assert_eq!(config.context_after, 20);
    }

    #[test]
    fn unknown_key_rejected() {
        let err =
            AnalyzerConfig::from_toml_str("max_errrors = 3", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, DiagnoseError::Config { .. }));
    }

    #[test]
    fn zero_caps_rejected() {
        assert!(AnalyzerConfig::default().with_max_errors(0).validate().is_err());
        assert!(AnalyzerConfig::default().with_max_matches(0).validate().is_err());
    }

    #[test]
    fn load_missing_file() {
        let err = AnalyzerConfig::load("/nonexistent/loglens.toml").unwrap_err();
        assert!(err.to_string().contains("loglens.toml"));
    }
}
