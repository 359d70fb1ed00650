//! Seek predicate derived from a cursor
//!
//! Rows after the cursor are those strictly beyond its sort value, plus, for
//! the inclusive operators, rows sharing the sort value whose unique id lies
//! beyond the tie-break id:
//!
//! ```text
//! ge:  key > value OR (key = value AND id > tie_break_id)
//! le:  key < value OR (key = value AND id < tie_break_id)
//! gt:  key > value
//! lt:  key < value
//! ```

use crate::core::predicate::{Operator, Predicate};
use crate::pagination::cursor::Cursor;

/// Build the predicate selecting the rows that follow `cursor`
pub fn build(cursor: &Cursor, unique_id_field: &str) -> Predicate {
    let value = cursor.value.to_field_value();
    let beyond = Predicate::compare(
        cursor.sort_field_key.as_str(),
        cursor.operator.strict(),
        value.clone(),
    );

    if !cursor.operator.admits_ties() {
        return beyond;
    }

    let tie_break = Predicate::and(vec![
        Predicate::compare(cursor.sort_field_key.as_str(), Operator::Eq, value),
        Predicate::compare(
            unique_id_field,
            cursor.operator.strict(),
            cursor.tie_break_id,
        ),
    ]);

    Predicate::or(vec![beyond, tie_break])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::cursor::{CursorOperator, SortValue};

    fn cursor(operator: CursorOperator) -> Cursor {
        Cursor {
            previous_cursor: None,
            sort_field_key: "display_name".to_string(),
            operator,
            value: SortValue::Str("Ana".to_string()),
            tie_break_id: 2,
        }
    }

    #[test]
    fn test_ge_admits_later_ids_with_equal_value() {
        assert_eq!(
            build(&cursor(CursorOperator::Ge), "id"),
            Predicate::Or(vec![
                Predicate::compare("display_name", Operator::Gt, "Ana"),
                Predicate::And(vec![
                    Predicate::compare("display_name", Operator::Eq, "Ana"),
                    Predicate::compare("id", Operator::Gt, 2_i64),
                ]),
            ])
        );
    }

    #[test]
    fn test_le_admits_earlier_ids_with_equal_value() {
        assert_eq!(
            build(&cursor(CursorOperator::Le), "id"),
            Predicate::Or(vec![
                Predicate::compare("display_name", Operator::Lt, "Ana"),
                Predicate::And(vec![
                    Predicate::compare("display_name", Operator::Eq, "Ana"),
                    Predicate::compare("id", Operator::Lt, 2_i64),
                ]),
            ])
        );
    }

    #[test]
    fn test_strict_operators_exclude_equal_values() {
        assert_eq!(
            build(&cursor(CursorOperator::Gt), "id"),
            Predicate::compare("display_name", Operator::Gt, "Ana")
        );
        assert_eq!(
            build(&cursor(CursorOperator::Lt), "id"),
            Predicate::compare("display_name", Operator::Lt, "Ana")
        );
    }

    #[test]
    fn test_int_values_compare_as_integers() {
        let cursor = Cursor {
            previous_cursor: None,
            sort_field_key: "id".to_string(),
            operator: CursorOperator::Gt,
            value: SortValue::Int(10),
            tie_break_id: 10,
        };
        assert_eq!(
            build(&cursor, "id"),
            Predicate::compare("id", Operator::Gt, 10_i64)
        );
    }
}
