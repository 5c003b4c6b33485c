use regex::{Captures, Regex};

use crate::error::Result;
use crate::metadata::{Assertion, FunctionalArea, Selector, SelectorKind, TestType};

/// Everything the pattern scan pulls out of one file's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub selectors: Vec<Selector>,
    pub assertions: Vec<Assertion>,
    pub dependencies: Vec<String>,
    pub timeouts: Vec<u64>,
}

/// Capture groups that may carry a selector value, evaluated in this
/// order; the first non-empty literal wins.
const SELECTOR_VALUE_GROUPS: &[&str] = &["loc_target", "action_target", "accessor_target"];

/// Accessor keywords checked against the raw match text, in this order.
/// A hit decides the selector kind before the xpath/css fallbacks run.
const ACCESSOR_KINDS: &[(&str, SelectorKind)] = &[
    ("getByTestId", SelectorKind::TestId),
    ("getByText", SelectorKind::Text),
    ("getByRole", SelectorKind::Role),
    ("getByLabel", SelectorKind::Label),
    ("getByPlaceholder", SelectorKind::Placeholder),
];

/// Lexical extractor for UI test specs. Pure text pattern matching,
/// no I/O and no syntax tree: malformed source degrades to fewer
/// matches, never to a failure.
pub struct PatternExtractor {
    selector: Regex,
    assertion: Regex,
    timeout: Regex,
    import: Regex,
    declaration: Regex,
    test_case: Regex,
    suite_decl: Regex,
    page_expectation: Regex,
    group_call: Regex,
}

impl PatternExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // One alternation per locator family: direct locator calls,
            // action calls with a literal target, named accessor calls.
            selector: Regex::new(
                r#"\.locator\(\s*['"](?P<loc_target>[^'"]+)['"]|\.(?P<action>click|fill|type|check|selectOption|hover|press)\(\s*['"](?P<action_target>[^'"]+)['"]|\.getBy(?:TestId|Text|Role|Label|Placeholder)\(\s*['"](?P<accessor_target>[^'"]+)['"]"#,
            )?,
            assertion: Regex::new(
                r#"expect\(\s*(?P<condition>[^)]*)\)\s*(?:\.\s*not)?\s*\.\s*to(?P<verb>Be|Have|Contain|Include|Equal|Match)(?P<qualifier>[^(;\n]*)"#,
            )?,
            timeout: Regex::new(r"timeout:\s*(\d+)")?,
            import: Regex::new(r#"import\s+(?:[^'";]*?\bfrom\s+)?['"](?P<source>[^'"]+)['"]"#)?,
            declaration: Regex::new(
                r#"(?:test\.describe|describe|test|it)\s*\(\s*['"](?P<title>[^'"]+)['"]"#,
            )?,
            test_case: Regex::new(r#"\b(?:test|it)\s*\(\s*['"](?P<name>[^'"]+)['"]"#)?,
            suite_decl: Regex::new(r"test\.describe\s*\(")?,
            page_expectation: Regex::new(r"expect\(\s*page")?,
            group_call: Regex::new(r"\bdescribe\s*\(")?,
        })
    }

    /// Scan raw file text for selectors, assertions, imports and
    /// timeouts. Pure function of the text.
    pub fn extract(&self, text: &str) -> Extraction {
        Extraction {
            selectors: self.extract_selectors(text),
            assertions: self.extract_assertions(text),
            dependencies: self.extract_dependencies(text),
            timeouts: self.extract_timeouts(text),
        }
    }

    fn extract_selectors(&self, text: &str) -> Vec<Selector> {
        let mut selectors = Vec::new();
        for caps in self.selector.captures_iter(text) {
            let Some(value) = first_present(&caps, SELECTOR_VALUE_GROUPS) else {
                continue;
            };
            let raw = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let usage = caps
                .name("action")
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "locator".to_string());
            selectors.push(Selector {
                kind: selector_kind(raw, value),
                value: value.to_string(),
                usage,
                line: line_at(text, match_offset(&caps)),
            });
        }
        selectors
    }

    fn extract_assertions(&self, text: &str) -> Vec<Assertion> {
        let mut assertions = Vec::new();
        for caps in self.assertion.captures_iter(text) {
            let condition = caps
                .name("condition")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let verb = caps.name("verb").map(|m| m.as_str()).unwrap_or_default();
            let qualifier = caps
                .name("qualifier")
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            assertions.push(Assertion {
                kind: format!("to{verb}{qualifier}"),
                condition,
                line: line_at(text, match_offset(&caps)),
            });
        }
        assertions
    }

    /// Every integer after a `timeout:` key, wherever it appears.
    fn extract_timeouts(&self, text: &str) -> Vec<u64> {
        self.timeout
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
            .collect()
    }

    /// Import source clauses in file order, duplicates retained.
    fn extract_dependencies(&self, text: &str) -> Vec<String> {
        self.import
            .captures_iter(text)
            .filter_map(|caps| caps.name("source").map(|m| m.as_str().to_string()))
            .collect()
    }

    /// First matching rule wins: suite declaration or page expectation
    /// mark a UI test, a bare test case is Funktional, a group call is
    /// Integration, anything else stays Unbekannt.
    pub fn classify_test_type(&self, text: &str) -> TestType {
        if self.suite_decl.is_match(text) {
            TestType::Ui
        } else if self.page_expectation.is_match(text) {
            TestType::Ui
        } else if self.test_case.is_match(text) {
            TestType::Funktional
        } else if self.group_call.is_match(text) {
            TestType::Integration
        } else {
            TestType::Unbekannt
        }
    }

    /// Title of the first suite/group/test declaration carrying a
    /// string-literal first argument.
    pub fn extract_title(&self, text: &str) -> Option<String> {
        self.declaration
            .captures(text)
            .and_then(|caps| caps.name("title"))
            .map(|m| m.as_str().to_string())
    }

    /// Literal of the first bare test-case call, used as the record's
    /// description.
    pub fn extract_description(&self, text: &str) -> Option<String> {
        self.test_case
            .captures(text)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str().to_string())
    }
}

/// Keyword tags inferred from case-insensitive substring presence.
/// Multiple areas may apply; none at all yields an empty set.
pub fn classify_functional_areas(text: &str) -> Vec<FunctionalArea> {
    let lower = text.to_lowercase();
    let mut areas = Vec::new();
    if lower.contains("login") || lower.contains("auth") {
        areas.push(FunctionalArea::Authentifizierung);
    }
    if lower.contains("dashboard") {
        areas.push(FunctionalArea::Dashboard);
    }
    if lower.contains("user") || lower.contains("profil") {
        areas.push(FunctionalArea::Benutzerverwaltung);
    }
    areas
}

/// First non-empty literal among the named groups, in table order.
fn first_present<'t>(caps: &Captures<'t>, groups: &[&str]) -> Option<&'t str> {
    groups
        .iter()
        .filter_map(|group| caps.name(group))
        .map(|m| m.as_str())
        .find(|value| !value.is_empty())
}

/// Kind precedence: accessor keyword in the raw match text, then a
/// leading `//` marking xpath, then plain CSS.
fn selector_kind(raw: &str, value: &str) -> SelectorKind {
    for (keyword, kind) in ACCESSOR_KINDS {
        if raw.contains(keyword) {
            return *kind;
        }
    }
    if value.starts_with("//") {
        SelectorKind::Xpath
    } else {
        SelectorKind::Css
    }
}

fn match_offset(caps: &Captures<'_>) -> usize {
    caps.get(0).map(|m| m.start()).unwrap_or(0)
}

/// 1-based line number of a byte offset, from the offsets the matching
/// pass already produced. No substring re-location.
fn line_at(text: &str, offset: usize) -> u32 {
    text[..offset].bytes().filter(|&b| b == b'\n').count() as u32 + 1
}
