//! Report model, renderers and output destinations
//!
//! Rendering is a pure function of the [`Report`] and [`RenderOptions`]. With
//! no timestamp the same report always renders to the same bytes.

mod bug;
mod detailed;

pub use bug::BugReport;
pub use detailed::DetailedReport;

use crate::classify::ClassifiedError;
use crate::encoding::ResolvedEncoding;
use crate::error::{DiagnoseError, DiagnoseResult};
use crate::tail::TailExcerpt;
use std::fmt;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Facts about the analysed log
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSummary {
    /// Log path as given
    pub path: String,
    /// Encoding used to decode it
    pub encoding: ResolvedEncoding,
    /// Replacement characters produced while decoding
    pub decode_errors: usize,
    /// Lines in the log
    pub total_lines: usize,
    /// Matching lines found before capping
    pub total_matches: usize,
}

/// Outcome of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Source facts
    pub summary: SourceSummary,
    /// Classified errors in log order
    pub errors: Vec<ClassifiedError>,
    /// Trailing lines, present only when nothing matched
    pub tail: Option<TailExcerpt>,
}

impl Report {
    /// True when no failure marker matched
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render in the given shape
    #[must_use]
    pub fn render(&self, shape: ReportShape, options: &RenderOptions) -> String {
        match shape {
            ReportShape::Detailed => DetailedReport::new(self, options).to_string(),
            ReportShape::BugReport => BugReport::new(self).to_string(),
        }
    }
}

/// Report layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportShape {
    /// Every captured error with fields, context and advice
    Detailed,
    /// One quoted block for the first error
    BugReport,
}

impl ReportShape {
    /// Leading context used when none is configured
    #[inline]
    #[must_use]
    pub fn default_context_before(self) -> usize {
        match self {
            Self::Detailed => 0,
            Self::BugReport => 2,
        }
    }
}

/// Inputs to rendering that do not come from the log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Analysis time shown in the detailed header
    pub timestamp: Option<String>,
}

impl RenderOptions {
    /// Create options without a timestamp
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With explicit timestamp text
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// With the current local time
    #[must_use]
    pub fn stamped_now(self) -> Self {
        self.with_timestamp(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

/// Where rendered text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output
    Stdout,
    /// File, parent directories created on demand
    File(PathBuf),
}

impl Destination {
    /// `-` is stdout, anything else a file path
    #[must_use]
    pub fn parse(target: &str) -> Self {
        if target == "-" {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(target))
        }
    }

    /// Write the full text
    pub fn write(&self, text: &str) -> DiagnoseResult<()> {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(text.as_bytes())
                    .and_then(|()| out.flush())
                    .map_err(|e| DiagnoseError::write("-", e))
            }
            Self::File(path) => write_file(path, text),
        }
    }
}

fn write_file(path: &Path, text: &str) -> DiagnoseResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DiagnoseError::write(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| DiagnoseError::write(path, e))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "output written");
    Ok(())
}

/// One line-numbered row; `marked` rows are prefixed with `>`
pub(crate) fn write_numbered(
    out: &mut impl fmt::Write,
    number: usize,
    text: &str,
    marked: bool,
) -> fmt::Result {
    let marker = if marked { '>' } else { ' ' };
    writeln!(out, "{marker} {number:>6} | {text}")
}

/// Indent every line of a multi-line block
pub(crate) fn write_indented(out: &mut impl fmt::Write, prefix: &str, text: &str) -> fmt::Result {
    for line in text.lines() {
        out.write_str(prefix)?;
        out.write_str(line)?;
        out.write_char('\n')?;
    }
    Ok(())
}
