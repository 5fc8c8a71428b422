//! Failure extraction with bounded context windows
//!
//! The scanner walks the log top to bottom. The earliest failure in a
//! cascaded build is usually the root cause, so matches keep log order and
//! the cap keeps the first ones.

mod patterns;

pub use patterns::PatternKind;
pub(crate) use patterns::{static_regex, CAUSE_LINE, STACK_FRAME};

use crate::error::{DiagnoseError, DiagnoseResult};
use crate::lines::{Line, LineIndex};

/// Scan parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    /// Maximum matches captured with context
    pub max_errors: usize,
    /// Lines captured before each match
    pub context_before: usize,
    /// Lines captured after each match
    pub context_after: usize,
}

impl ScanParams {
    /// Default match cap
    pub const DEFAULT_MAX_ERRORS: usize = 5;
    /// Default trailing context
    pub const DEFAULT_CONTEXT_AFTER: usize = 20;

    /// Create scan parameters
    #[inline]
    #[must_use]
    pub fn new(max_errors: usize, context_before: usize, context_after: usize) -> Self {
        Self {
            max_errors,
            context_before,
            context_after,
        }
    }

    /// Reject a zero match cap
    pub fn validate(&self) -> DiagnoseResult<()> {
        if self.max_errors == 0 {
            return Err(DiagnoseError::invalid_parameter("max_errors must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ScanParams {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ERRORS, 0, Self::DEFAULT_CONTEXT_AFTER)
    }
}

/// One failure marker occurrence with its own copy of surrounding lines
///
/// Context windows of neighbouring matches may overlap; each match still
/// carries a full copy so it can be read on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMatch {
    line_number: usize,
    pattern_kind: PatternKind,
    matched_text: String,
    context_before: Vec<Line>,
    context_after: Vec<Line>,
}

impl ErrorMatch {
    /// Create match
    #[must_use]
    pub fn new(
        line_number: usize,
        pattern_kind: PatternKind,
        matched_text: impl Into<String>,
        context_before: Vec<Line>,
        context_after: Vec<Line>,
    ) -> Self {
        Self {
            line_number,
            pattern_kind,
            matched_text: matched_text.into(),
            context_before,
            context_after,
        }
    }

    /// 1-based line of the marker
    #[inline]
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Marker that matched
    #[inline]
    #[must_use]
    pub fn pattern_kind(&self) -> PatternKind {
        self.pattern_kind
    }

    /// Full text of the matched line
    #[inline]
    #[must_use]
    pub fn matched_text(&self) -> &str {
        &self.matched_text
    }

    /// Lines preceding the match, in log order
    #[inline]
    #[must_use]
    pub fn context_before(&self) -> &[Line] {
        &self.context_before
    }

    /// Lines following the match, in log order
    #[inline]
    #[must_use]
    pub fn context_after(&self) -> &[Line] {
        &self.context_after
    }

    /// Trailing context lines that are stack frames or chained causes
    #[must_use]
    pub fn stack_trace(&self) -> Vec<&Line> {
        self.context_after
            .iter()
            .filter(|l| STACK_FRAME.is_match(&l.text) || CAUSE_LINE.is_match(&l.text))
            .collect()
    }
}

/// Scan result: capped matches plus the uncapped total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// First `max_errors` matches in log order
    pub matches: Vec<ErrorMatch>,
    /// Every matching line, including those past the cap
    pub total_matches: usize,
}

impl ScanOutcome {
    /// True when matches past the cap were dropped
    #[inline]
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.total_matches > self.matches.len()
    }
}

/// Applies the failure markers to a [`LineIndex`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorScanner {
    params: ScanParams,
}

impl ErrorScanner {
    /// Create scanner
    #[inline]
    #[must_use]
    pub fn new(params: ScanParams) -> Self {
        Self { params }
    }

    /// Parameters in use
    #[inline]
    #[must_use]
    pub fn params(&self) -> ScanParams {
        self.params
    }

    /// Scan the whole log
    ///
    /// Context is only captured for the first `max_errors` matches; lines
    /// after the cap are counted, not copied.
    #[must_use]
    pub fn scan(&self, index: &LineIndex) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for (number, text) in index.iter() {
            if outcome.matches.len() >= self.params.max_errors {
                if PatternKind::any_match(text) {
                    outcome.total_matches += 1;
                }
                continue;
            }

            let Some(kind) = PatternKind::detect(text) else {
                continue;
            };
            outcome.total_matches += 1;
            outcome.matches.push(ErrorMatch::new(
                number,
                kind,
                text,
                index.before(number, self.params.context_before),
                index.after(number, self.params.context_after),
            ));
        }

        tracing::debug!(
            captured = outcome.matches.len(),
            total = outcome.total_matches,
            "scan complete"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(text: &str) -> LineIndex {
        LineIndex::new(text)
    }

    #[test]
    fn captures_in_log_order() {
        let log = "[INFO] start\n[ERROR] first\nok\nFoo threw BarException\n";
        let outcome = ErrorScanner::new(ScanParams::new(5, 0, 1)).scan(&index(log));
        let lines: Vec<_> = outcome.matches.iter().map(ErrorMatch::line_number).collect();
        assert_eq!(lines, vec![2, 4]);
        assert_eq!(outcome.matches[0].pattern_kind(), PatternKind::BracketError);
        assert_eq!(outcome.matches[1].pattern_kind(), PatternKind::Exception);
    }

    #[test]
    fn cap_keeps_counting() {
        let log = (1..=12)
            .map(|i| format!("[ERROR] failure {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let outcome = ErrorScanner::new(ScanParams::new(3, 0, 2)).scan(&index(&log));
        assert_eq!(outcome.matches.len(), 3);
        assert_eq!(outcome.total_matches, 12);
        assert!(outcome.truncated());
    }

    #[test]
    fn overlapping_windows_not_deduplicated() {
        let log = "[ERROR] a\n[ERROR] b\n[ERROR] c";
        let outcome = ErrorScanner::new(ScanParams::new(5, 1, 1)).scan(&index(log));
        assert_eq!(outcome.matches.len(), 3);
        assert_eq!(outcome.matches[0].context_after()[0].text, "[ERROR] b");
        assert_eq!(outcome.matches[1].context_before()[0].text, "[ERROR] a");
        assert_eq!(outcome.matches[1].context_after()[0].text, "[ERROR] c");
    }

    #[test]
    fn context_clipped_at_boundaries() {
        let log = "[ERROR] top\nmiddle\n[ERROR] bottom";
        let outcome = ErrorScanner::new(ScanParams::new(5, 5, 5)).scan(&index(log));
        assert!(outcome.matches[0].context_before().is_empty());
        assert_eq!(outcome.matches[0].context_after().len(), 2);
        assert_eq!(outcome.matches[1].context_before().len(), 2);
        assert!(outcome.matches[1].context_after().is_empty());
    }

    #[test]
    fn stack_trace_lines() {
        let log = "java.lang.IllegalStateException: boom\n\tat a.B.c(B.java:1)\nnoise\nCaused by: x.YException\n\tat d.E.f(E.java:2)";
        let outcome = ErrorScanner::new(ScanParams::new(1, 0, 10)).scan(&index(log));
        let trace: Vec<_> = outcome.matches[0]
            .stack_trace()
            .into_iter()
            .map(|l| l.number)
            .collect();
        assert_eq!(trace, vec![2, 4, 5]);
    }

    #[test]
    fn zero_cap_rejected() {
        assert!(ScanParams::new(0, 0, 0).validate().is_err());
        assert!(ScanParams::default().validate().is_ok());
    }
}
