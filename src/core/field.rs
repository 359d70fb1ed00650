//! Field value types shared by predicates, ordering and cursors

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A polymorphic field value that can hold the scalar types an entity exposes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Compare two values of the same kind
    ///
    /// Returns `None` when the kinds differ: an integer is never "less than"
    /// a string, so predicates over mismatched kinds simply do not match.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Null, FieldValue::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Total order used when sorting result sets
    ///
    /// Nulls sort first, then booleans, integers and strings.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.rank().cmp(&other.rank()))
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) => 2,
            FieldValue::String(_) => 3,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_option_is_null() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(42_i64)), FieldValue::Integer(42));
    }

    #[test]
    fn test_compare_same_kind() {
        assert_eq!(
            FieldValue::from(3_i64).compare(&FieldValue::from(10_i64)),
            Some(Ordering::Less)
        );
        // Lexicographic, not numeric
        assert_eq!(
            FieldValue::from("10").compare(&FieldValue::from("3")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_compare_mismatched_kinds_is_none() {
        assert_eq!(FieldValue::from(1_i64).compare(&FieldValue::from("1")), None);
        assert_eq!(FieldValue::Null.compare(&FieldValue::from(0_i64)), None);
    }

    #[test]
    fn test_sort_cmp_puts_nulls_first() {
        let mut values = vec![
            FieldValue::from("b"),
            FieldValue::Null,
            FieldValue::from(7_i64),
            FieldValue::from("a"),
        ];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::from(7_i64),
                FieldValue::from("a"),
                FieldValue::from("b"),
            ]
        );
    }
}
