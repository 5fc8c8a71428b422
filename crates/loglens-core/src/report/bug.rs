//! Condensed bug report for the first (usually root) failure

use super::Report;
use crate::classify::{ClassifiedError, Field};
use std::fmt::{self, Display, Formatter};

/// Trailing context lines included in the key trace
const KEY_TRACE_AFTER: usize = 5;

/// Renders one quoted block for the first error
#[derive(Debug, Clone, Copy)]
pub struct BugReport<'a> {
    report: &'a Report,
}

impl<'a> BugReport<'a> {
    /// Create renderer
    #[inline]
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }
}

/// `file:[line,col]`, or as much of it as was located
fn location(error: &ClassifiedError) -> String {
    let fields = error.fields();
    match (fields.get(Field::File), fields.get(Field::Line), fields.get(Field::Col)) {
        (Some(file), Some(line), Some(col)) => format!("{file}:[{line},{col}]"),
        (Some(file), Some(line), None) => format!("{file}:[{line}]"),
        (Some(file), None, _) => file.to_owned(),
        (None, ..) => "Unknown".to_owned(),
    }
}

impl Display for BugReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(first) = self.report.errors.first() else {
            writeln!(f, "> **[Bug Report]**")?;
            writeln!(f, "> No failure patterns matched in {}.", self.report.summary.path)?;
            if let Some(tail) = &self.report.tail {
                writeln!(f)?;
                writeln!(f, "```text")?;
                write!(f, "{tail}")?;
                writeln!(f, "```")?;
            }
            return Ok(());
        };

        let error = first.error();
        writeln!(f, "> **[Bug Report]**")?;
        writeln!(f, "> * **Failure Type**: {}", first.category())?;
        writeln!(f, "> * **Location**: {}", location(first))?;
        writeln!(f, "> * **Key Trace**:")?;
        writeln!(f, "> ```text")?;
        for line in error.context_before() {
            writeln!(f, "> {}", line.text)?;
        }
        writeln!(f, "> {}", error.matched_text())?;
        for line in error.context_after().iter().take(KEY_TRACE_AFTER) {
            writeln!(f, "> {}", line.text)?;
        }
        writeln!(f, "> ```")?;
        writeln!(
            f,
            "> * **Root Cause**: {}",
            first.root_cause().unwrap_or("not determined")
        )
    }
}
