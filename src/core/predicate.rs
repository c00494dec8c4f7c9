// LogSieve - core/predicate.rs
//
// Compiled line predicates: literal and regex sub-tests combined under
// ALL or ANY aggregation.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::util::constants;
use crate::util::error::FilterError;
use regex::Regex;
use serde::Deserialize;

/// How a predicate combines its sub-tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Every sub-test must match. No sub-tests matches every line.
    All,
    /// At least one sub-test must match. No sub-tests matches nothing.
    Any,
}

impl MatchMode {
    pub fn from_all_match(all_match: bool) -> Self {
        if all_match {
            Self::All
        } else {
            Self::Any
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

/// One sub-test as written in a filter definition.
///
/// The historical JSON keys `reg` / `keyword` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermSpec {
    #[serde(alias = "reg")]
    pub is_pattern: bool,
    #[serde(alias = "keyword")]
    pub term: String,
}

impl TermSpec {
    pub fn literal(term: impl Into<String>) -> Self {
        Self {
            is_pattern: false,
            term: term.into(),
        }
    }

    pub fn pattern(term: impl Into<String>) -> Self {
        Self {
            is_pattern: true,
            term: term.into(),
        }
    }
}

/// A compiled sub-test.
#[derive(Debug, Clone)]
pub enum Term {
    /// Case-sensitive substring containment.
    Literal(String),
    /// Unanchored regex search.
    Pattern(Regex),
}

impl Term {
    #[inline]
    pub fn test(&self, line: &str) -> bool {
        match self {
            Self::Literal(needle) => line.contains(needle.as_str()),
            Self::Pattern(regex) => regex.is_match(line),
        }
    }
}

/// A named, immutable line predicate.
#[derive(Debug, Clone)]
pub struct Predicate {
    name: String,
    terms: Vec<Term>,
    mode: MatchMode,
}

impl Predicate {
    /// Compile a predicate. Every pattern is compiled here so a bad pattern
    /// fails before any line is read.
    pub fn new(
        name: impl Into<String>,
        specs: &[TermSpec],
        mode: MatchMode,
    ) -> Result<Self, FilterError> {
        let name = name.into();
        let terms = specs
            .iter()
            .map(|spec| compile_term(&name, spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { name, terms, mode })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns true if `line` satisfies this predicate.
    pub fn matches(&self, line: &str) -> bool {
        match self.mode {
            MatchMode::All => self.terms.iter().all(|t| t.test(line)),
            MatchMode::Any => self.terms.iter().any(|t| t.test(line)),
        }
    }
}

fn compile_term(filter: &str, spec: &TermSpec) -> Result<Term, FilterError> {
    if !spec.is_pattern {
        return Ok(Term::Literal(spec.term.clone()));
    }

    let length = spec.term.chars().count();
    if length > constants::MAX_REGEX_PATTERN_LENGTH {
        return Err(FilterError::RegexTooLong {
            filter: filter.to_string(),
            length,
            max_length: constants::MAX_REGEX_PATTERN_LENGTH,
        });
    }

    Regex::new(&spec.term)
        .map(Term::Pattern)
        .map_err(|e| FilterError::InvalidRegex {
            filter: filter.to_string(),
            pattern: spec.term.clone(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(words: &[&str], mode: MatchMode) -> Predicate {
        let specs: Vec<_> = words.iter().map(|w| TermSpec::literal(*w)).collect();
        Predicate::new("test", &specs, mode).unwrap()
    }

    const SAMPLE_LINES: &[&str] = &[
        "",
        " ",
        "sandwich",
        "sand",
        "wich",
        "ERROR disk full",
        "v1.2 release",
        "naïve café",
    ];

    #[test]
    fn test_empty_all_matches_every_line() {
        let p = Predicate::new("empty", &[], MatchMode::All).unwrap();
        for line in SAMPLE_LINES {
            assert!(p.matches(line), "ALL with no terms must match {line:?}");
        }
    }

    #[test]
    fn test_empty_any_matches_no_line() {
        let p = Predicate::new("empty", &[], MatchMode::Any).unwrap();
        for line in SAMPLE_LINES {
            assert!(!p.matches(line), "ANY with no terms must reject {line:?}");
        }
    }

    #[test]
    fn test_plain_literal() {
        let p = literals(&["et"], MatchMode::All);
        assert!(p.matches("et"));
        assert!(p.matches("et1"));
        assert!(p.matches("1et"));
        assert!(!p.matches("te"));
        assert!(!p.matches("sd"));
        assert!(!p.matches(""));
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        let p = literals(&["ERROR"], MatchMode::All);
        assert!(p.matches("ERROR disk full"));
        assert!(!p.matches("error disk full"));
    }

    #[test]
    fn test_literal_is_not_a_regex() {
        let p = literals(&["a.c"], MatchMode::All);
        assert!(p.matches("xa.cx"));
        assert!(!p.matches("abc"));
    }

    #[test]
    fn test_all_mode() {
        let p = literals(&["sand", "wich"], MatchMode::All);
        for line in ["sandwich", "wichsand", "sand,wich", "wich,sand", "sandwichor", "andwichsand"] {
            assert!(p.matches(line), "{line}");
        }
        for line in ["sand*ich", "sand", "wich"] {
            assert!(!p.matches(line), "{line}");
        }
    }

    #[test]
    fn test_any_mode() {
        let p = literals(&["sand", "wich"], MatchMode::Any);
        for line in ["sandwich", "wichsand", "sand", "wich", "sandy", "swich"] {
            assert!(p.matches(line), "{line}");
        }
        assert!(!p.matches("san**ich"));
    }

    #[test]
    fn test_regex_searches_anywhere() {
        let p = Predicate::new(
            "numbers",
            &[TermSpec::pattern(r"etc:\s*-?\d+(?:\.\d+)?")],
            MatchMode::All,
        )
        .unwrap();
        assert!(p.matches("etc: 3.14"));
        assert!(p.matches("prefix etc: 3.14"));
        assert!(p.matches("etc: 3.14 suffix"));
        assert!(p.matches("prefix etc: 42 end"));
        assert!(p.matches("prefix etc: -0.5 end"));
        assert!(!p.matches("prefix etc: end"));
        assert!(!p.matches("prefix etc: ,"));
    }

    #[test]
    fn test_mixed_terms_follow_aggregation() {
        let specs = [TermSpec::literal("disk"), TermSpec::pattern(r"^ERROR")];
        let all = Predicate::new("mixed", &specs, MatchMode::All).unwrap();
        let any = Predicate::new("mixed", &specs, MatchMode::Any).unwrap();

        for line in ["ERROR disk full", "ERROR net down", "WARN disk slow", "INFO ok"] {
            let results: Vec<bool> = all.terms().iter().map(|t| t.test(line)).collect();
            assert_eq!(all.matches(line), results.iter().all(|&r| r), "{line}");
            assert_eq!(any.matches(line), results.iter().any(|&r| r), "{line}");
        }
    }

    #[test]
    fn test_invalid_regex_fails_at_construction() {
        let result = Predicate::new("broken", &[TermSpec::pattern("(")], MatchMode::All);
        assert!(
            matches!(result, Err(FilterError::InvalidRegex { ref filter, .. }) if filter == "broken"),
            "expected InvalidRegex, got {result:?}"
        );
    }

    #[test]
    fn test_overlong_regex_rejected() {
        let pattern = "a".repeat(constants::MAX_REGEX_PATTERN_LENGTH + 1);
        let result = Predicate::new("long", &[TermSpec::pattern(pattern)], MatchMode::Any);
        assert!(matches!(result, Err(FilterError::RegexTooLong { .. })));
    }

    #[test]
    fn test_term_spec_accepts_legacy_keys() {
        let legacy: TermSpec = serde_json::from_str(r#"{"reg": true, "keyword": "\\d+"}"#).unwrap();
        let modern: TermSpec =
            serde_json::from_str(r#"{"is_pattern": true, "term": "\\d+"}"#).unwrap();
        assert_eq!(legacy, modern);
        assert_eq!(legacy, TermSpec::pattern(r"\d+"));
    }
}
