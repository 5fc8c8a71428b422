//! Failure marker patterns
//!
//! Order of [`PatternKind::PRIORITY`] is the tie-break for a line that
//! matches more than one marker.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use std::fmt::{self, Display, Formatter};

/// Kind of failure marker found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternKind {
    /// `[ERROR]` / `[FATAL]` log-level marker
    BracketError,
    /// Chained exception cause
    CausedBy,
    /// Build or test failure summary
    Failure,
    /// Bare exception type name
    Exception,
}

impl PatternKind {
    /// All kinds, highest priority first
    pub const PRIORITY: [Self; 4] = [
        Self::BracketError,
        Self::CausedBy,
        Self::Failure,
        Self::Exception,
    ];

    /// Stable upper-case name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BracketError => "BRACKET_ERROR",
            Self::CausedBy => "CAUSED_BY",
            Self::Failure => "FAILURE",
            Self::Exception => "EXCEPTION",
        }
    }

    /// Regex source for this marker
    #[inline]
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::BracketError => r"\[(?:ERROR|FATAL)\]",
            Self::CausedBy => r"Caused by",
            Self::Failure => r"FAILURE|Test.*FAILED",
            Self::Exception => r"\w*Exception\b",
        }
    }

    /// Highest-priority kind matching `line`, if any
    #[must_use]
    pub fn detect(line: &str) -> Option<Self> {
        MARKERS
            .matches(line)
            .iter()
            .next()
            .map(|i| Self::PRIORITY[i])
    }

    /// True when any marker matches `line`
    #[inline]
    #[must_use]
    pub fn any_match(line: &str) -> bool {
        MARKERS.is_match(line)
    }

    /// True when `line` carries a marker and starts a failure of its own
    ///
    /// Stack frames, `Caused by:` lines and indented `[ERROR]` detail lines
    /// continue the failure above them.
    #[must_use]
    pub fn opens_failure(line: &str) -> bool {
        MARKERS.is_match(line)
            && !(STACK_FRAME.is_match(line)
                || CAUSE_LINE.is_match(line)
                || MARKER_DETAIL.is_match(line))
    }
}

impl Display for PatternKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set index `i` corresponds to `PatternKind::PRIORITY[i]`
static MARKERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(PatternKind::PRIORITY.iter().map(|k| k.pattern()))
        .expect("marker patterns compile")
});

/// Indented `at pkg.Class.method(...)` frame
pub(crate) static STACK_FRAME: Lazy<Regex> = Lazy::new(|| static_regex(r"^\s+at\s+[\w.$<>]+"));

/// Chained cause at the start of a line
pub(crate) static CAUSE_LINE: Lazy<Regex> = Lazy::new(|| static_regex(r"^Caused by:"));

/// `[ERROR]   symbol: ...` detail under a compiler diagnostic
static MARKER_DETAIL: Lazy<Regex> = Lazy::new(|| static_regex(r"^\[(?:ERROR|FATAL)\]\s{2,}"));

/// Compile a pattern from a static table
pub(crate) fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}
