//! Positional field extraction
//!
//! Each extractor searches the evidence in order (matched line, trailing
//! context, leading context) and keeps the first hit. A field that cannot be
//! located is left out.

use super::{Category, Evidence, ExtractedFields, Field};
use crate::scanner::{static_regex, STACK_FRAME};
use once_cell::sync::Lazy;
use regex::Regex;

/// `path/File.java:[12,5]` (Maven compiler plugin)
static BRACKET_POSITION: Lazy<Regex> = Lazy::new(|| {
    static_regex(r"((?:[A-Za-z]:)?[^\s\[\]:]+\.[A-Za-z0-9]+):\[(\d+)[,:](\d+)\]")
});

/// `File.java:12:` or `File.kt:12:5` (javac, Gradle, kotlinc)
static COLON_POSITION: Lazy<Regex> = Lazy::new(|| {
    static_regex(r"([^\s:\[\]()]+\.(?:java|kt|kts|scala|groovy)):(\d+)(?::(\d+))?")
});

static SYMBOL: Lazy<Regex> = Lazy::new(|| {
    static_regex(
        r"symbol:\s+(?:(class|interface|enum|record|method|variable|constructor|package|static)\s+)?(\S.*?)\s*$",
    )
});

static LOCATION: Lazy<Regex> = Lazy::new(|| static_regex(r"location:\s+(\S.*?)\s*$"));

static PACKAGE: Lazy<Regex> = Lazy::new(|| static_regex(r"package\s+([\w.]+)\s+does not exist"));

/// `actual` then `expected`
static CONVERSION: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        static_regex(r"incompatible types:\s+(.+?)\s+cannot be converted to\s+(.+?)\s*$"),
        static_regex(r"(?i)type mismatch:\s*inferred type is\s+(.+?)\s+but\s+(.+?)\s+was expected"),
    ]
});

static REQUIRED: Lazy<Regex> = Lazy::new(|| static_regex(r"\brequired:\s+(\S.*?)\s*$"));

static FOUND: Lazy<Regex> = Lazy::new(|| static_regex(r"\bfound:\s+(\S.*?)\s*$"));

/// `expected` then `actual`, both on one line
static ASSERTION_INLINE: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        static_regex(r"expected:?\s*<(.*?)>\s*but was:?\s*<(.*?)>"),
        static_regex(r"(?i)expected:?\s*\[(.*?)\]\s*but (?:was|found):?\s*\[(.*?)\]"),
    ]
});

static ASSERTION_EXPECTED: Lazy<Regex> =
    Lazy::new(|| static_regex(r"(?i)^\s*expected\s*:\s*(\S.*?)\s*$"));

static ASSERTION_ACTUAL: Lazy<Regex> =
    Lazy::new(|| static_regex(r"(?i)^\s*(?:but was|actual)\s*:\s*(\S.*?)\s*$"));

static BEAN: Lazy<[Regex; 5]> = Lazy::new(|| {
    [
        static_regex(r"No qualifying bean of type '([^']+)'"),
        static_regex(r"bean with name '([^']+)'"),
        static_regex(r"[Bb]ean named '([^']+)'"),
        static_regex(r"The bean '([^']+)'"),
        static_regex(r"(?i)could not autowire\.?\s*no beans of '([^']+)'"),
    ]
});

static ARTIFACT: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        static_regex(r"Could not find artifact (\S+)"),
        static_regex(r"NoSuchMethodError:\s*'?([^']+?)'?\s*$"),
        static_regex(r"NoClassDefFoundError:\s*(\S+)"),
        static_regex(r"IncompatibleClassChangeError:\s*(\S.*?)\s*$"),
    ]
});

static EXCEPTION_TYPE: Lazy<Regex> =
    Lazy::new(|| static_regex(r"\b([A-Z][A-Za-z0-9_$]*(?:Exception|Error))\b"));

/// Extract the fields relevant to `category`
pub(super) fn extract(category: Category, evidence: &Evidence<'_>) -> ExtractedFields {
    let mut fields = ExtractedFields::new();
    if category == Category::Unknown {
        return fields;
    }

    position(evidence, &mut fields);

    match category {
        Category::SymbolNotFound => {
            if let Some(caps) = evidence.captures(&SYMBOL) {
                if let Some(kind) = caps.get(1) {
                    fields.insert(Field::SymbolKind, kind.as_str());
                }
                fields.insert(Field::Symbol, &caps[2]);
            }
            if let Some(caps) = evidence.captures(&LOCATION) {
                fields.insert(Field::Location, &caps[1]);
            }
        }
        Category::PackageNotFound => {
            if let Some(caps) = evidence.captures(&PACKAGE) {
                fields.insert(Field::Package, &caps[1]);
            }
        }
        Category::TypeMismatch => {
            if let Some(caps) = CONVERSION.iter().find_map(|re| evidence.captures(re)) {
                fields.insert(Field::Actual, &caps[1]);
                fields.insert(Field::Expected, &caps[2]);
            }
            if let Some(caps) = evidence.captures(&REQUIRED) {
                fields.insert(Field::Expected, &caps[1]);
            }
            if let Some(caps) = evidence.captures(&FOUND) {
                fields.insert(Field::Actual, &caps[1]);
            }
        }
        Category::NullPointer => {
            if let Some(frame) = evidence.lines().find(|l| STACK_FRAME.is_match(l)) {
                fields.insert(Field::StackFrame, frame.trim());
            }
        }
        Category::AssertionFailure => {
            if let Some(caps) = ASSERTION_INLINE.iter().find_map(|re| evidence.captures(re)) {
                fields.insert(Field::Expected, &caps[1]);
                fields.insert(Field::Actual, &caps[2]);
            }
            if let Some(caps) = evidence.captures(&ASSERTION_EXPECTED) {
                fields.insert(Field::Expected, &caps[1]);
            }
            if let Some(caps) = evidence.captures(&ASSERTION_ACTUAL) {
                fields.insert(Field::Actual, &caps[1]);
            }
        }
        Category::ConfigurationError => {
            if let Some(caps) = BEAN.iter().find_map(|re| evidence.captures(re)) {
                fields.insert(Field::BeanOrComponent, &caps[1]);
            }
        }
        Category::DependencyConflict => {
            if let Some(caps) = ARTIFACT.iter().find_map(|re| evidence.captures(re)) {
                fields.insert(Field::Artifact, &caps[1]);
            }
        }
        Category::Unknown => {}
    }

    if let Some(caps) = evidence.captures(&EXCEPTION_TYPE) {
        fields.insert(Field::Exception, &caps[1]);
    }

    let layer = fields.get(Field::File).and_then(layer_of);
    if let Some(layer) = layer {
        fields.insert(Field::Layer, layer);
    }

    fields
}

/// Source position from the earliest evidence line carrying one
fn position(evidence: &Evidence<'_>, fields: &mut ExtractedFields) {
    let caps = evidence.lines().find_map(|line| {
        BRACKET_POSITION
            .captures(line)
            .or_else(|| COLON_POSITION.captures(line))
    });
    if let Some(caps) = caps {
        fields.insert(Field::File, &caps[1]);
        fields.insert(Field::Line, &caps[2]);
        if let Some(col) = caps.get(3) {
            fields.insert(Field::Col, col.as_str());
        }
    }
}

/// DDD layer implied by a source path
fn layer_of(file: &str) -> Option<&'static str> {
    let file = file.to_ascii_lowercase();
    if file.contains("infrastructure") {
        Some("infrastructure")
    } else if file.contains("domain") {
        Some("domain")
    } else if file.contains("application") {
        Some("application")
    } else if file.contains("interface") || file.contains("controller") {
        Some("interface")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(category: Category, lines: &[&str]) -> ExtractedFields {
        extract(category, &Evidence::from_lines(lines.to_vec()))
    }

    #[test]
    fn symbol_fields() {
        let f = fields(
            Category::SymbolNotFound,
            &[
                r"[ERROR] C:\dev\shop\src\main\java\com\shop\domain\OrderService.java:[12,5] cannot find symbol",
                "[ERROR]   symbol:   class Money",
                "[ERROR]   location: class com.shop.domain.OrderService",
            ],
        );
        assert_eq!(
            f.get(Field::File),
            Some(r"C:\dev\shop\src\main\java\com\shop\domain\OrderService.java")
        );
        assert_eq!(f.get(Field::Line), Some("12"));
        assert_eq!(f.get(Field::Col), Some("5"));
        assert_eq!(f.get(Field::Symbol), Some("Money"));
        assert_eq!(f.get(Field::SymbolKind), Some("class"));
        assert_eq!(f.get(Field::Location), Some("class com.shop.domain.OrderService"));
        assert_eq!(f.get(Field::Layer), Some("domain"));
    }

    #[test]
    fn unix_path_position() {
        let f = fields(
            Category::SymbolNotFound,
            &["[ERROR] /work/app/src/Foo.java:[3,17] cannot find symbol"],
        );
        assert_eq!(f.get(Field::File), Some("/work/app/src/Foo.java"));
        assert_eq!(f.get(Field::Line), Some("3"));
        assert_eq!(f.get(Field::Col), Some("17"));
    }

    #[test]
    fn javac_colon_position_without_column() {
        let f = fields(
            Category::SymbolNotFound,
            &["src/main/java/a/Foo.java:42: error: cannot find symbol"],
        );
        assert_eq!(f.get(Field::File), Some("src/main/java/a/Foo.java"));
        assert_eq!(f.get(Field::Line), Some("42"));
        assert_eq!(f.get(Field::Col), None);
    }

    #[test]
    fn matched_line_position_beats_context() {
        let f = fields(
            Category::SymbolNotFound,
            &[
                "src/main/java/a/Foo.java:42: error: cannot find symbol",
                "[ERROR] /w/src/a/Bar.java:[10,5] cannot find symbol",
            ],
        );
        assert_eq!(f.get(Field::File), Some("src/main/java/a/Foo.java"));
        assert_eq!(f.get(Field::Line), Some("42"));
        assert_eq!(f.get(Field::Col), None);
    }

    #[test]
    fn package_field() {
        let f = fields(
            Category::PackageNotFound,
            &["[ERROR] Foo.java:[3,1] package org.apache.commons.lang3 does not exist"],
        );
        assert_eq!(f.get(Field::Package), Some("org.apache.commons.lang3"));
    }

    #[test]
    fn type_conversion_fields() {
        let f = fields(
            Category::TypeMismatch,
            &["[ERROR] A.java:[9,20] incompatible types: java.lang.String cannot be converted to int"],
        );
        assert_eq!(f.get(Field::Actual), Some("java.lang.String"));
        assert_eq!(f.get(Field::Expected), Some("int"));
    }

    #[test]
    fn type_required_found_lines() {
        let f = fields(
            Category::TypeMismatch,
            &[
                "A.java:9: error: incompatible types",
                "  required: List<Order>",
                "  found:    Set<Order>",
            ],
        );
        assert_eq!(f.get(Field::Expected), Some("List<Order>"));
        assert_eq!(f.get(Field::Actual), Some("Set<Order>"));
    }

    #[test]
    fn null_pointer_first_frame() {
        let f = fields(
            Category::NullPointer,
            &[
                "java.lang.NullPointerException: Cannot invoke \"Money.add()\"",
                "\tat com.shop.Order.total(Order.java:31)",
                "\tat com.shop.OrderService.checkout(OrderService.java:12)",
            ],
        );
        assert_eq!(f.get(Field::StackFrame), Some("at com.shop.Order.total(Order.java:31)"));
        assert_eq!(f.get(Field::Exception), Some("NullPointerException"));
    }

    #[test]
    fn junit_inline_assertion() {
        let f = fields(
            Category::AssertionFailure,
            &["org.opentest4j.AssertionFailedError: expected: <100> but was: <90>"],
        );
        assert_eq!(f.get(Field::Expected), Some("100"));
        assert_eq!(f.get(Field::Actual), Some("90"));
        assert_eq!(f.get(Field::Exception), Some("AssertionFailedError"));
    }

    #[test]
    fn diff_style_assertion() {
        let f = fields(
            Category::AssertionFailure,
            &["java.lang.AssertionError:", "Expected :PAID", "Actual   :NEW"],
        );
        assert_eq!(f.get(Field::Expected), Some("PAID"));
        assert_eq!(f.get(Field::Actual), Some("NEW"));
    }

    #[test]
    fn bean_field() {
        let f = fields(
            Category::ConfigurationError,
            &["NoSuchBeanDefinitionException: No qualifying bean of type 'com.shop.OrderRepository' available"],
        );
        assert_eq!(f.get(Field::BeanOrComponent), Some("com.shop.OrderRepository"));
    }

    #[test]
    fn conflict_field() {
        let f = fields(
            Category::DependencyConflict,
            &["java.lang.NoSuchMethodError: 'void com.google.common.base.Preconditions.checkState(boolean)'"],
        );
        assert_eq!(
            f.get(Field::Artifact),
            Some("void com.google.common.base.Preconditions.checkState(boolean)")
        );
    }

    #[test]
    fn unknown_has_no_fields() {
        let f = fields(Category::Unknown, &["[ERROR] /a/B.java:[1,2] whatever IOException"]);
        assert!(f.is_empty());
    }

    #[test]
    fn layer_detection() {
        assert_eq!(layer_of("/src/infrastructure/persistence/A.java"), Some("infrastructure"));
        assert_eq!(layer_of("/src/Application/Service.java"), Some("application"));
        assert_eq!(layer_of("/src/web/OrderController.java"), Some("interface"));
        assert_eq!(layer_of("/src/util/A.java"), None);
    }
}
