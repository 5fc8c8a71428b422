//! Last-lines excerpt

use crate::lines::{Line, LineIndex};
use crate::report::write_numbered;
use std::fmt::{self, Display, Formatter};

/// Verbatim trailing lines of a log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailExcerpt {
    /// Lines in log order
    pub lines: Vec<Line>,
    /// Lines in the whole log
    pub total_lines: usize,
}

impl Display for TailExcerpt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Last {} of {} lines:", self.lines.len(), self.total_lines)?;
        for line in &self.lines {
            write_numbered(f, line.number, &line.text, false)?;
        }
        Ok(())
    }
}

/// Reads the last `count` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailReader {
    count: usize,
}

impl TailReader {
    /// Create reader
    #[inline]
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Requested line count
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Take the excerpt
    #[must_use]
    pub fn read(&self, index: &LineIndex) -> TailExcerpt {
        TailExcerpt {
            lines: index.last(self.count),
            total_lines: index.len(),
        }
    }
}
