//! Advisory text keyed by failure category
//!
//! Everything here is a static lookup. Advice is never authoritative and
//! never blocks a report: a category without an entry simply gets none.

use crate::classify::{Category, ExtractedFields, Field};

/// Root cause, remediation and hints for one classified error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advice {
    /// One-line explanation
    pub root_cause: Option<&'static str>,
    /// Ordered remediation steps
    pub suggestions: Vec<String>,
    /// Secondary notes from keyword heuristics
    pub hints: Vec<&'static str>,
}

/// Keyword heuristic producing a hint when any keyword appears
struct HintRule {
    keywords: &'static [&'static str],
    requires: &'static [&'static str],
    hint: &'static str,
}

/// Matched case-insensitively against the evidence
const HINT_RULES: &[HintRule] = &[
    HintRule {
        keywords: &["lombok"],
        requires: &[],
        hint: "Lombok involved: install the IDE plugin, enable annotation processing, check the Lombok version",
    },
    HintRule {
        keywords: &["mapper", "@mapperscan"],
        requires: &[],
        hint: "MyBatis mapper involved: check the @MapperScan package, the mapper interface location and the XML mapping path",
    },
    HintRule {
        keywords: &["connection"],
        requires: &["refused", "timeout", "timed out"],
        hint: "Database connection failed: make sure the database is up, verify the datasource settings, check network and firewall",
    },
    HintRule {
        keywords: &["aggregate", "entity", "valueobject"],
        requires: &[],
        hint: "Domain model involved: check aggregate invariants and business rules",
    },
];

/// Maps a category and its fields to advisory text
#[derive(Debug, Clone, Copy, Default)]
pub struct RootCauseAdvisor;

impl RootCauseAdvisor {
    /// Create advisor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// One-line root cause for `category`
    #[must_use]
    pub fn root_cause(&self, category: Category) -> Option<&'static str> {
        let text = match category {
            Category::SymbolNotFound => {
                "missing import, misspelled identifier, or missing dependency declaration"
            }
            Category::PackageNotFound => {
                "dependency that provides the package is not declared or not resolved"
            }
            Category::TypeMismatch => {
                "declared type and assigned value disagree, or a generic type argument is wrong"
            }
            Category::NullPointer => "object dereferenced before it was initialised",
            Category::AssertionFailure => {
                "test expectation differs from actual behaviour, or mock setup is incomplete"
            }
            Category::ConfigurationError => {
                "bean missing from the context: absent annotation, component scan path, or circular dependency"
            }
            Category::DependencyConflict => {
                "two versions of a library on the classpath, or code compiled against a different version than it runs with"
            }
            Category::Unknown => return None,
        };
        Some(text)
    }

    /// Remediation steps for `category`, refined by the located fields
    #[must_use]
    pub fn suggestions(&self, category: Category, fields: &ExtractedFields) -> Vec<String> {
        let steps: &[&str] = match category {
            Category::SymbolNotFound => match fields.get(Field::SymbolKind) {
                Some("method") => &[
                    "check the method name spelling",
                    "confirm the receiver type declares this method",
                    "check whether a cast is needed",
                ],
                Some("variable") => &[
                    "check the variable is declared",
                    "confirm the variable is in scope",
                ],
                _ => &[
                    "check for a missing import statement",
                    "confirm the class name spelling",
                    "check the Maven dependencies include the class's package",
                ],
            },
            Category::PackageNotFound => &[
                "add the Maven dependency providing the package to pom.xml",
                "run mvn clean install to rebuild",
                "check the dependency version is compatible",
            ],
            Category::TypeMismatch => &[
                "check the declared type matches the assigned value",
                "add the necessary conversion",
                "check generic type arguments",
            ],
            Category::NullPointer => &[
                "check the object is initialised before use",
                "add a null check or use Optional",
                "guard value object constructors with Objects.requireNonNull()",
            ],
            Category::AssertionFailure => &[
                "check the expected value in the test",
                "confirm mock behaviour is fully stubbed",
                "verify the test data satisfies the business rules",
            ],
            Category::ConfigurationError => &[
                "check the @Component/@Service annotation is present",
                "confirm the component scan path covers the class",
                "look for circular dependencies",
            ],
            Category::DependencyConflict => &[
                "run mvn dependency:tree to find duplicate versions",
                "pin the version in dependencyManagement or exclude the transitive copy",
            ],
            Category::Unknown => &[],
        };

        let mut suggestions: Vec<String> = steps.iter().map(|s| (*s).to_owned()).collect();
        match (category, fields.get(Field::Symbol), fields.get(Field::Package)) {
            (Category::SymbolNotFound, Some(symbol), _) => {
                suggestions.insert(0, format!("resolve `{symbol}`"));
            }
            (Category::PackageNotFound, _, Some(package)) => {
                suggestions.insert(0, format!("declare a dependency that provides `{package}`"));
            }
            _ => {}
        }
        suggestions
    }

    /// Hints triggered by keywords anywhere in the evidence
    #[must_use]
    pub fn hints(&self, evidence: &[&str]) -> Vec<&'static str> {
        let text = evidence.join("\n").to_lowercase();
        HINT_RULES
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| text.contains(k)))
            .filter(|rule| {
                rule.requires.is_empty() || rule.requires.iter().any(|r| text.contains(r))
            })
            .map(|rule| rule.hint)
            .collect()
    }

    /// Full advice for one classified match
    #[must_use]
    pub fn advise(
        &self,
        category: Category,
        fields: &ExtractedFields,
        evidence: &[&str],
    ) -> Advice {
        Advice {
            root_cause: self.root_cause(category),
            suggestions: self.suggestions(category, fields),
            hints: self.hints(evidence),
        }
    }
}
