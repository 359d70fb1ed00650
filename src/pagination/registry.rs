//! Filter registry
//!
//! Maps a filter name to a builder that turns the raw query value into one
//! or more storage predicates. Registries are static tables of function
//! pointers, fixed at compile time; callers never supply filter names that
//! are not in the table.

use crate::core::error::PaginationError;
use crate::core::predicate::Predicate;
use crate::entities::profile::{self, normalize_text};
use std::collections::BTreeMap;

/// Raw value of a filter as it arrived in the query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
}

impl FilterValue {
    /// Append another raw value, turning a single value into a list
    pub fn push(self, value: String) -> Self {
        match self {
            FilterValue::Single(first) => FilterValue::Many(vec![first, value]),
            FilterValue::Many(mut values) => {
                values.push(value);
                FilterValue::Many(values)
            }
        }
    }

    /// All raw values, in arrival order
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(value) => vec![value.as_str()],
            FilterValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// The last raw value, for filters that take a single value
    pub fn last(&self) -> &str {
        match self {
            FilterValue::Single(value) => value,
            FilterValue::Many(values) => values.last().map(String::as_str).unwrap_or(""),
        }
    }

    fn display(&self) -> String {
        self.values().join(",")
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Filters of one request, keyed by name
///
/// Ordered so that the resolved conjunction is deterministic.
pub type FilterParams = BTreeMap<String, FilterValue>;

/// Turns a raw value into predicates
pub type FilterBuilder = fn(name: &str, value: &FilterValue) -> Result<Vec<Predicate>, PaginationError>;

/// Static table of named filter builders
pub struct FilterRegistry {
    entries: &'static [(&'static str, FilterBuilder)],
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl FilterRegistry {
    pub const fn new(entries: &'static [(&'static str, FilterBuilder)]) -> Self {
        Self { entries }
    }

    /// Names of every registered filter
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Resolve one filter into predicates
    pub fn resolve(&self, name: &str, value: &FilterValue) -> Result<Vec<Predicate>, PaginationError> {
        let builder = self
            .entries
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, builder)| *builder)
            .ok_or_else(|| PaginationError::UnknownFilter {
                name: name.to_string(),
            })?;

        builder(name, value)
    }

    /// Resolve every filter of a request into one flat list of predicates
    ///
    /// The list is meant to be conjoined: filters only ever narrow the
    /// result set, none overrides another.
    pub fn resolve_all(&self, params: &FilterParams) -> Result<Vec<Predicate>, PaginationError> {
        let mut predicates = Vec::new();
        for (name, value) in params {
            predicates.extend(self.resolve(name, value)?);
        }
        Ok(predicates)
    }
}

/// Filters accepted by the profile listing
pub static PROFILE_FILTERS: FilterRegistry = FilterRegistry::new(&[
    ("courses_in", courses_in as FilterBuilder),
    ("interests_in", interests_in as FilterBuilder),
    ("display_name_ilike", display_name_ilike as FilterBuilder),
]);

fn parse_ids(name: &str, value: &FilterValue) -> Result<Vec<i64>, PaginationError> {
    value
        .values()
        .into_iter()
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| PaginationError::InvalidFilterValue {
                    name: name.to_string(),
                    value: value.display(),
                    message: format!("'{}' is not an integer id", raw),
                })
        })
        .collect()
}

/// `course_id IN (..)` over the courses linked to a profile
pub fn courses_in(name: &str, value: &FilterValue) -> Result<Vec<Predicate>, PaginationError> {
    let ids = parse_ids(name, value)?;
    Ok(vec![Predicate::in_set(profile::fields::COURSE_ID, ids)])
}

/// `interest_id IN (..)` over the interests linked to a profile
pub fn interests_in(name: &str, value: &FilterValue) -> Result<Vec<Predicate>, PaginationError> {
    let ids = parse_ids(name, value)?;
    Ok(vec![Predicate::in_set(profile::fields::INTEREST_ID, ids)])
}

/// Accent- and case-insensitive substring match on the display name
pub fn display_name_ilike(
    name: &str,
    value: &FilterValue,
) -> Result<Vec<Predicate>, PaginationError> {
    let needle = normalize_text(value.last().trim());
    if needle.is_empty() {
        return Err(PaginationError::InvalidFilterValue {
            name: name.to_string(),
            value: value.display(),
            message: "search text is empty".to_string(),
        });
    }

    Ok(vec![Predicate::ilike(
        profile::fields::DISPLAY_NAME_NORMALIZED,
        format!("%{}%", needle),
    )])
}
