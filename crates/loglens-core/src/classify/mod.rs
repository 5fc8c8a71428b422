//! Failure taxonomy and structured field extraction
//!
//! Every [`ErrorMatch`] is classified into exactly one [`Category`]. The
//! category rules and the field extractors both read the same evidence: the
//! matched line, then the trailing context, then the leading context, cut
//! where a neighbouring failure begins.

mod extract;
mod rules;

use crate::advisor::RootCauseAdvisor;
use crate::scanner::{ErrorMatch, PatternKind};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Failure category, in rule priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// `cannot find symbol`
    SymbolNotFound,
    /// `package X does not exist`
    PackageNotFound,
    /// Incompatible or unconvertible types
    TypeMismatch,
    /// `NullPointerException`
    NullPointer,
    /// Test assertion did not hold
    AssertionFailure,
    /// Dependency injection wiring failure
    ConfigurationError,
    /// Classpath or version conflict
    DependencyConflict,
    /// No rule matched
    Unknown,
}

impl Category {
    /// All categories, highest priority first
    pub const PRIORITY: [Self; 8] = [
        Self::SymbolNotFound,
        Self::PackageNotFound,
        Self::TypeMismatch,
        Self::NullPointer,
        Self::AssertionFailure,
        Self::ConfigurationError,
        Self::DependencyConflict,
        Self::Unknown,
    ];

    /// Stable display name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SymbolNotFound => "SymbolNotFound",
            Self::PackageNotFound => "PackageNotFound",
            Self::TypeMismatch => "TypeMismatch",
            Self::NullPointer => "NullPointer",
            Self::AssertionFailure => "AssertionFailure",
            Self::ConfigurationError => "ConfigurationError",
            Self::DependencyConflict => "DependencyConflict",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of an extracted field
///
/// Declaration order is the order fields are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Source file path
    File,
    /// Source line
    Line,
    /// Source column
    Col,
    /// Enclosing class or method reported by the compiler
    Location,
    /// Unresolved identifier
    Symbol,
    /// Kind of the unresolved identifier (`class`, `method`, `variable`, ...)
    SymbolKind,
    /// Missing package
    Package,
    /// Expected type or value
    Expected,
    /// Actual type or value
    Actual,
    /// First stack frame
    StackFrame,
    /// Bean type or name
    BeanOrComponent,
    /// Conflicting artifact, class or member
    Artifact,
    /// First exception or error type name
    Exception,
    /// Architectural layer implied by the file path
    Layer,
}

impl Field {
    /// Stable field name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Line => "line",
            Self::Col => "col",
            Self::Location => "location",
            Self::Symbol => "symbol",
            Self::SymbolKind => "symbolKind",
            Self::Package => "package",
            Self::Expected => "expected",
            Self::Actual => "actual",
            Self::StackFrame => "stackFrame",
            Self::BeanOrComponent => "beanOrComponent",
            Self::Artifact => "artifact",
            Self::Exception => "exception",
            Self::Layer => "layer",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field values located in the evidence
///
/// The first value recorded for a field is kept; later inserts are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    values: BTreeMap<Field, String>,
}

impl ExtractedFields {
    /// Create empty field set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` unless the field already has one
    pub fn insert(&mut self, field: Field, value: impl Into<String>) {
        self.values.entry(field).or_insert_with(|| value.into());
    }

    /// Value for `field`, if located
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Iterate fields in render order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of located fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was located
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evidence lines of one match in lookup order
pub(crate) struct Evidence<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Evidence<'a> {
    /// Matched line, then trailing context, then leading context
    ///
    /// Trailing context stops at the next line opening another failure once a
    /// category trigger has been seen. Leading context keeps only the lines
    /// after the last failure opened above the match.
    pub(crate) fn of(error: &'a ErrorMatch) -> Self {
        let matched = error.matched_text();
        let mut lines = vec![matched];
        let mut triggered = rules::has_trigger(matched);
        for line in error.context_after() {
            let text = line.text.as_str();
            if triggered && PatternKind::opens_failure(text) {
                break;
            }
            triggered |= rules::has_trigger(text);
            lines.push(text);
        }

        let before = error.context_before();
        let start = before
            .iter()
            .rposition(|l| PatternKind::opens_failure(&l.text))
            .map_or(0, |i| i + 1);
        lines.extend(before[start..].iter().map(|l| l.text.as_str()));
        Self { lines }
    }

    #[cfg(test)]
    pub(crate) fn from_lines(lines: Vec<&'a str>) -> Self {
        Self { lines }
    }

    pub(crate) fn lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().copied()
    }

    pub(crate) fn as_slice(&self) -> &[&'a str] {
        &self.lines
    }

    /// Captures from the first evidence line that `re` matches
    pub(crate) fn captures(&self, re: &Regex) -> Option<Captures<'a>> {
        self.lines.iter().find_map(|line| re.captures(line))
    }
}

/// A match with its category, fields and advice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    error: ErrorMatch,
    category: Category,
    fields: ExtractedFields,
    root_cause: Option<&'static str>,
    suggestions: Vec<String>,
    hints: Vec<&'static str>,
}

impl ClassifiedError {
    /// Raw match
    #[inline]
    #[must_use]
    pub fn error(&self) -> &ErrorMatch {
        &self.error
    }

    /// Assigned category
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Located fields
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &ExtractedFields {
        &self.fields
    }

    /// One-line explanation, absent for [`Category::Unknown`]
    #[inline]
    #[must_use]
    pub fn root_cause(&self) -> Option<&'static str> {
        self.root_cause
    }

    /// Ordered remediation steps
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Secondary notes from keyword heuristics
    #[inline]
    #[must_use]
    pub fn hints(&self) -> &[&'static str] {
        &self.hints
    }
}

/// Assigns categories, fields and advice to raw matches
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier {
    advisor: RootCauseAdvisor,
}

impl ErrorClassifier {
    /// Create classifier
    #[inline]
    #[must_use]
    pub fn new(advisor: RootCauseAdvisor) -> Self {
        Self { advisor }
    }

    /// Classify one match
    #[must_use]
    pub fn classify(&self, error: ErrorMatch) -> ClassifiedError {
        let (category, fields, advice) = {
            let evidence = Evidence::of(&error);
            let category = rules::categorize(&evidence);
            let fields = extract::extract(category, &evidence);
            let advice = self.advisor.advise(category, &fields, evidence.as_slice());
            (category, fields, advice)
        };

        tracing::debug!(
            line = error.line_number(),
            category = category.as_str(),
            fields = fields.len(),
            "classified"
        );

        ClassifiedError {
            error,
            category,
            fields,
            root_cause: advice.root_cause,
            suggestions: advice.suggestions,
            hints: advice.hints,
        }
    }

    /// Classify every match, keeping order
    #[must_use]
    pub fn classify_all(&self, errors: Vec<ErrorMatch>) -> Vec<ClassifiedError> {
        errors.into_iter().map(|e| self.classify(e)).collect()
    }
}
