// LogSieve - core/filter_set.rs
//
// Filter definition parsing and the validated, ordered predicate collection.
// Core layer: accepts JSON strings, never touches the filesystem.
// I/O is handled by app::filter_mgr which feeds content here.

use crate::core::predicate::{MatchMode, Predicate, TermSpec};
use crate::core::sanitize;
use crate::util::constants;
use crate::util::error::FilterError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

// =============================================================================
// JSON deserialization structures (raw input)
// =============================================================================

/// One named filter as written in a definitions file.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterDefinition {
    pub name: String,
    #[serde(default = "default_all_match")]
    pub all_match: bool,
    #[serde(default, alias = "terms")]
    pub filters: Vec<TermSpec>,
}

fn default_all_match() -> bool {
    true
}

/// Parse a JSON array of filter definitions.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_definitions_json(
    content: &str,
    source_path: &Path,
) -> Result<Vec<FilterDefinition>, FilterError> {
    serde_json::from_str(content).map_err(|e| FilterError::JsonParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

/// Built-in example definitions, used when no filter file is configured.
pub fn builtin_definitions_json() -> &'static str {
    include_str!("../../filters/example_filters.json")
}

// =============================================================================
// Validated collection
// =============================================================================

/// Ordered collection of predicates with unique names and distinct output
/// file stems. Iteration order is definition order.
#[derive(Debug, Clone, Default)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    /// Validate an ordered list of compiled predicates.
    ///
    /// Rejects empty names, duplicate names, names that sanitize to an empty
    /// file stem, and names whose file stems collide (with each other or with
    /// a `reserved` stem such as the pass-through file).
    pub fn new(predicates: Vec<Predicate>, reserved: &[(&str, &str)]) -> Result<Self, FilterError> {
        if predicates.len() > constants::MAX_FILTERS {
            return Err(FilterError::TooManyFilters {
                count: predicates.len(),
                max: constants::MAX_FILTERS,
            });
        }

        let mut names = HashSet::with_capacity(predicates.len());
        for (index, predicate) in predicates.iter().enumerate() {
            let name = predicate.name();
            if name.trim().is_empty() || sanitize::file_stem(name).is_empty() {
                return Err(FilterError::EmptyName { index });
            }
            if !names.insert(name) {
                return Err(FilterError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        sanitize::check_injective(predicates.iter().map(Predicate::name), reserved)?;

        Ok(Self { predicates })
    }

    /// Compile definitions into a validated set. The first bad definition
    /// aborts the whole load; no partial set is returned.
    pub fn from_definitions(
        definitions: &[FilterDefinition],
        reserved: &[(&str, &str)],
    ) -> Result<Self, FilterError> {
        let predicates = definitions
            .iter()
            .map(|def| {
                let mode = MatchMode::from_all_match(def.all_match);
                tracing::debug!(
                    filter = %def.name,
                    mode = mode.label(),
                    terms = def.filters.len(),
                    "Compiling filter"
                );
                Predicate::new(def.name.clone(), &def.filters, mode)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let set = Self::new(predicates, reserved)?;
        tracing::debug!(filters = set.len(), "Filter set compiled");
        Ok(set)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(Predicate::name)
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}
