//! Keyword search with symmetric context
//!
//! Hits keep log order. Collection stops at the cap but counting does not,
//! so the result knows whether more lines matched.

use crate::error::{DiagnoseError, DiagnoseResult};
use crate::lines::{Line, LineIndex};
use crate::report::write_numbered;
use regex::Regex;
use std::fmt::{self, Display, Formatter};

/// What to look for on each line
#[derive(Debug, Clone)]
pub enum Query {
    /// Case-sensitive substring
    Literal(String),
    /// Regular expression
    Pattern(Regex),
}

impl Query {
    /// Substring query
    pub fn literal(keyword: impl Into<String>) -> DiagnoseResult<Self> {
        let keyword = keyword.into();
        if keyword.is_empty() {
            return Err(DiagnoseError::invalid_parameter("search keyword is empty"));
        }
        Ok(Self::Literal(keyword))
    }

    /// Regex query
    pub fn regex(pattern: &str) -> DiagnoseResult<Self> {
        if pattern.is_empty() {
            return Err(DiagnoseError::invalid_parameter("search pattern is empty"));
        }
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Query text as given
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(keyword) => keyword,
            Self::Pattern(re) => re.as_str(),
        }
    }

    /// True when `line` matches
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Literal(keyword) => line.contains(keyword.as_str()),
            Self::Pattern(re) => re.is_match(line),
        }
    }
}

/// Search parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Lines captured on each side of a hit
    pub context_lines: usize,
    /// Maximum hits captured
    pub max_matches: usize,
}

impl SearchParams {
    /// Create search parameters
    #[inline]
    #[must_use]
    pub fn new(context_lines: usize, max_matches: usize) -> Self {
        Self {
            context_lines,
            max_matches,
        }
    }

    /// Reject a zero hit cap
    pub fn validate(&self) -> DiagnoseResult<()> {
        if self.max_matches == 0 {
            return Err(DiagnoseError::invalid_parameter("max_matches must be at least 1"));
        }
        Ok(())
    }
}

/// One matching line with its context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// 1-based line of the hit
    pub line_number: usize,
    /// Lines before the hit
    pub context_before: Vec<Line>,
    /// Text of the hit
    pub matched_line: String,
    /// Lines after the hit
    pub context_after: Vec<Line>,
}

/// Search outcome
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Query text
    pub query: String,
    /// Captured hits in log order
    pub hits: Vec<SearchHit>,
    /// Every matching line, including those past the cap
    pub total_matches: usize,
    /// Lines in the log
    pub total_lines: usize,
}

impl SearchResult {
    /// True when hits past the cap were dropped
    #[inline]
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.total_matches > self.hits.len()
    }
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Search '{}': {} matching line(s) in {} lines, showing {}",
            self.query,
            self.total_matches,
            self.total_lines,
            self.hits.len()
        )?;
        if self.hits.is_empty() {
            return writeln!(f, "No lines matched.");
        }

        for (i, hit) in self.hits.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "--- match {} at line {} ---", i + 1, hit.line_number)?;
            for line in &hit.context_before {
                write_numbered(f, line.number, &line.text, false)?;
            }
            write_numbered(f, hit.line_number, &hit.matched_line, true)?;
            for line in &hit.context_after {
                write_numbered(f, line.number, &line.text, false)?;
            }
        }

        if self.truncated() {
            writeln!(f)?;
            writeln!(
                f,
                "... {} more matching line(s) not shown",
                self.total_matches - self.hits.len()
            )?;
        }
        Ok(())
    }
}

/// Runs a [`Query`] over a [`LineIndex`]
#[derive(Debug, Clone, Copy)]
pub struct InteractiveSearcher {
    params: SearchParams,
}

impl InteractiveSearcher {
    /// Create searcher
    #[inline]
    #[must_use]
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }

    /// Search the whole log
    #[must_use]
    pub fn search(&self, index: &LineIndex, query: &Query) -> SearchResult {
        let mut hits = Vec::new();
        let mut total_matches = 0;

        for (number, text) in index.iter().filter(|(_, text)| query.is_match(text)) {
            total_matches += 1;
            if hits.len() < self.params.max_matches {
                hits.push(SearchHit {
                    line_number: number,
                    context_before: index.before(number, self.params.context_lines),
                    matched_line: text.to_owned(),
                    context_after: index.after(number, self.params.context_lines),
                });
            }
        }

        tracing::debug!(
            query = query.as_str(),
            hits = hits.len(),
            total = total_matches,
            "search complete"
        );
        SearchResult {
            query: query.as_str().to_owned(),
            hits,
            total_matches,
            total_lines: index.len(),
        }
    }
}
