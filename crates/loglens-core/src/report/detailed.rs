//! Full diagnostic report

use super::{write_indented, write_numbered, RenderOptions, Report};
use crate::classify::ClassifiedError;
use std::fmt::{self, Display, Formatter};

const RULE: &str =
    "================================================================================";

/// Renders every captured error with fields, context and advice
#[derive(Debug, Clone, Copy)]
pub struct DetailedReport<'a> {
    report: &'a Report,
    options: &'a RenderOptions,
}

impl<'a> DetailedReport<'a> {
    /// Create renderer
    #[inline]
    #[must_use]
    pub fn new(report: &'a Report, options: &'a RenderOptions) -> Self {
        Self { report, options }
    }

    fn header(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let summary = &self.report.summary;
        writeln!(f, "# Build Log Diagnostic Report")?;
        writeln!(f)?;
        writeln!(f, "Log file:      {}", summary.path)?;
        if let Some(timestamp) = &self.options.timestamp {
            writeln!(f, "Analyzed at:   {timestamp}")?;
        }
        writeln!(f, "Encoding:      {}", summary.encoding)?;
        writeln!(f, "Decode errors: {}", summary.decode_errors)?;
        writeln!(f, "Total lines:   {}", summary.total_lines)?;
        writeln!(
            f,
            "Errors shown:  {} of {} found",
            self.report.errors.len(),
            summary.total_matches
        )
    }
}

impl Display for DetailedReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.header(f)?;

        if self.report.is_clean() {
            writeln!(f)?;
            writeln!(f, "No failure patterns matched.")?;
            if let Some(tail) = &self.report.tail {
                writeln!(f)?;
                write!(f, "{tail}")?;
            }
            return Ok(());
        }

        for (i, error) in self.report.errors.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{RULE}")?;
            write_error(f, i + 1, error)?;
        }
        writeln!(f)?;
        writeln!(f, "{RULE}")?;

        let summary = &self.report.summary;
        if summary.total_matches > self.report.errors.len() {
            writeln!(
                f,
                "{} further matching line(s) not shown; raise --max-errors to see them.",
                summary.total_matches - self.report.errors.len()
            )?;
        }
        Ok(())
    }
}

fn write_error(f: &mut Formatter<'_>, ordinal: usize, classified: &ClassifiedError) -> fmt::Result {
    let error = classified.error();
    writeln!(
        f,
        "## Error {ordinal}: {} / {}",
        error.pattern_kind(),
        classified.category()
    )?;
    writeln!(f)?;
    writeln!(f, "Line:    {}", error.line_number())?;
    writeln!(f, "Matched: {}", error.matched_text())?;

    if !classified.fields().is_empty() {
        writeln!(f)?;
        writeln!(f, "### Fields")?;
        for (field, value) in classified.fields().iter() {
            writeln!(f, "  {field}: {value}")?;
        }
    }

    let trace = error.stack_trace();
    if !trace.is_empty() {
        writeln!(f)?;
        writeln!(f, "### Stack trace")?;
        for line in trace {
            writeln!(f, "  {}", line.text.trim_start())?;
        }
    }

    writeln!(f)?;
    writeln!(f, "### Context")?;
    for line in error.context_before() {
        write_numbered(f, line.number, &line.text, false)?;
    }
    write_numbered(f, error.line_number(), error.matched_text(), true)?;
    for line in error.context_after() {
        write_numbered(f, line.number, &line.text, false)?;
    }

    if let Some(cause) = classified.root_cause() {
        writeln!(f)?;
        writeln!(f, "### Root cause")?;
        write_indented(f, "  ", cause)?;
    }

    if !classified.suggestions().is_empty() {
        writeln!(f)?;
        writeln!(f, "### Suggestions")?;
        for (i, step) in classified.suggestions().iter().enumerate() {
            writeln!(f, "  {}. {step}", i + 1)?;
        }
    }

    if !classified.hints().is_empty() {
        writeln!(f)?;
        writeln!(f, "### Hints")?;
        for hint in classified.hints() {
            writeln!(f, "  - {hint}")?;
        }
    }
    Ok(())
}
