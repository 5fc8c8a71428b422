//! Category trigger table
//!
//! Evaluated top to bottom; the first rule whose trigger appears anywhere in
//! the evidence decides the category. Reordering this table changes the
//! outcome for ambiguous matches.

use super::{Category, Evidence};
use crate::scanner::static_regex;
use once_cell::sync::Lazy;
use regex::Regex;

struct Rule {
    category: Category,
    trigger: Regex,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        (Category::SymbolNotFound, r"cannot find symbol"),
        (Category::PackageNotFound, r"package\s+[\w.]+\s+does not exist"),
        (
            Category::TypeMismatch,
            r"incompatible types|(?i:type mismatch)|cannot be converted to",
        ),
        (Category::NullPointer, r"NullPointerException"),
        (
            Category::AssertionFailure,
            r"AssertionError|AssertionFailedError|ComparisonFailure|(?i:expected\b.*\bbut was\b)",
        ),
        (
            Category::ConfigurationError,
            r"NoSuchBeanDefinition|BeanDefinitionOverride|UnsatisfiedDependency|No qualifying bean|(?i:could not autowire)",
        ),
        (
            Category::DependencyConflict,
            r"NoSuchMethodError|NoClassDefFoundError|IncompatibleClassChangeError|(?i:dependency convergence|version conflict)|Could not resolve dependencies",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| Rule {
        category,
        trigger: static_regex(pattern),
    })
    .collect()
});

/// True when some rule triggers on `line`
pub(super) fn has_trigger(line: &str) -> bool {
    RULES.iter().any(|rule| rule.trigger.is_match(line))
}

/// First category whose trigger appears in the evidence
pub(super) fn categorize(evidence: &Evidence<'_>) -> Category {
    RULES
        .iter()
        .find(|rule| evidence.lines().any(|line| rule.trigger.is_match(line)))
        .map_or(Category::Unknown, |rule| rule.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::Line;
    use crate::scanner::{ErrorMatch, PatternKind};

    fn category_of(lines: &[&str]) -> Category {
        categorize(&Evidence::from_lines(lines.to_vec()))
    }

    #[test]
    fn each_trigger() {
        assert_eq!(
            category_of(&["[ERROR] x.java:[1,1] cannot find symbol"]),
            Category::SymbolNotFound
        );
        assert_eq!(
            category_of(&["[ERROR] package org.junit does not exist"]),
            Category::PackageNotFound
        );
        assert_eq!(
            category_of(&["incompatible types: String cannot be converted to int"]),
            Category::TypeMismatch
        );
        assert_eq!(category_of(&["java.lang.NullPointerException"]), Category::NullPointer);
        assert_eq!(
            category_of(&["org.opentest4j.AssertionFailedError: expected: <1> but was: <2>"]),
            Category::AssertionFailure
        );
        assert_eq!(
            category_of(&["NoSuchBeanDefinitionException: No qualifying bean of type 'a.B'"]),
            Category::ConfigurationError
        );
        assert_eq!(
            category_of(&["java.lang.NoSuchMethodError: 'void a.B.c()'"]),
            Category::DependencyConflict
        );
        assert_eq!(category_of(&["[ERROR] something odd"]), Category::Unknown);
    }

    #[test]
    fn earlier_rule_wins_on_same_line() {
        assert_eq!(
            category_of(&["cannot find symbol while handling NullPointerException"]),
            Category::SymbolNotFound
        );
    }

    #[test]
    fn cascaded_errors_classify_by_their_own_evidence() {
        let log = [
            "[ERROR] /w/src/a/Foo.java:[3,8] package org.apache.commons.lang3 does not exist",
            "[ERROR] /w/src/a/Bar.java:[10,5] cannot find symbol",
            "[ERROR]   symbol:   class StringUtils",
        ];
        let first = ErrorMatch::new(
            1,
            PatternKind::BracketError,
            log[0],
            vec![],
            vec![Line::new(2, log[1]), Line::new(3, log[2])],
        );
        let second = ErrorMatch::new(
            2,
            PatternKind::BracketError,
            log[1],
            vec![Line::new(1, log[0])],
            vec![Line::new(3, log[2])],
        );
        assert_eq!(categorize(&Evidence::of(&first)), Category::PackageNotFound);
        assert_eq!(categorize(&Evidence::of(&second)), Category::SymbolNotFound);
        assert!(has_trigger(log[0]));
        assert!(!has_trigger(log[2]));
    }

    #[test]
    fn context_lines_count_as_evidence() {
        assert_eq!(
            category_of(&[
                "[ERROR] Tests run: 1, Errors: 1",
                "java.lang.NullPointerException: null",
            ]),
            Category::NullPointer
        );
    }
}
