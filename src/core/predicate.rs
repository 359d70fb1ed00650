//! Storage-agnostic predicates and ordering
//!
//! A [`Predicate`] describes a filter condition without committing to any
//! query language. Storage backends translate it (or evaluate it directly,
//! as the in-memory backend does).

use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};

/// Comparison operator of a [`Predicate::Compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

/// A filter condition over entity fields
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field <op> value`
    Compare {
        field: String,
        op: Operator,
        value: FieldValue,
    },

    /// `field IN (values)`
    In {
        field: String,
        values: Vec<FieldValue>,
    },

    /// Case-insensitive pattern match, `%` and `_` are wildcards
    ILike { field: String, pattern: String },

    /// Conjunction; an empty conjunction matches everything
    And(Vec<Predicate>),

    /// Disjunction; an empty disjunction matches nothing
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: Operator, value: impl Into<FieldValue>) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, Operator::Eq, value)
    }

    pub fn in_set<V: Into<FieldValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Predicate::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::ILike {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Build a conjunction, flattening nested `And`s
    ///
    /// A single operand is returned as-is.
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat = Vec::new();
        for predicate in predicates {
            match predicate {
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Predicate::And(flat)
        }
    }

    /// Build a disjunction, flattening nested `Or`s
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat = Vec::new();
        for predicate in predicates {
            match predicate {
                Predicate::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Predicate::Or(flat)
        }
    }
}

/// Sort direction of a query
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Deterministic ordering: a sort field, then the unique id as tie-break
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub sort_field: String,
    pub unique_id: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(
        sort_field: impl Into<String>,
        unique_id: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        Self {
            sort_field: sort_field.into(),
            unique_id: unique_id.into(),
            direction,
        }
    }
}
