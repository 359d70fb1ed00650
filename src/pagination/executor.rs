//! Single over-fetching read behind each page

use crate::core::entity::Entity;
use crate::core::error::PaginationError;
use crate::core::predicate::{OrderBy, Predicate, SortDirection};
use crate::core::service::QueryExecutor;
use crate::pagination::cursor::{Cursor, SortField};
use crate::pagination::predicate_builder;

/// Rows of one page, plus whether anything follows them
#[derive(Debug, Clone)]
pub struct Window<T> {
    pub rows: Vec<T>,
    pub has_more: bool,
}

/// Fetch one page worth of rows
///
/// Reads `limit + 1` rows in a single query; the extra row only tells
/// whether another page exists and is never returned. Rows are ordered by
/// the sort field then the unique id, descending when the cursor walks
/// backwards.
pub async fn fetch<T, E>(
    store: &E,
    filters: Vec<Predicate>,
    cursor: Option<&Cursor>,
    sort_field: &SortField,
    limit: usize,
) -> Result<Window<T>, PaginationError>
where
    T: Entity,
    E: QueryExecutor<T> + ?Sized,
{
    let mut predicates = filters;
    let direction = match cursor {
        Some(cursor) => {
            predicates.push(predicate_builder::build(cursor, T::unique_id_field()));
            cursor.operator.direction()
        }
        None => SortDirection::Ascending,
    };

    let predicate = Predicate::and(predicates);
    let order_by = OrderBy::new(sort_field.key.as_str(), T::unique_id_field(), direction);
    let fetch_limit = limit.checked_add(1).ok_or(PaginationError::InvalidLimit {
        limit,
        max: usize::MAX - 1,
    })?;

    let mut rows = store
        .execute_query(&predicate, &order_by, fetch_limit)
        .await?;

    let has_more = rows.len() > limit;
    rows.truncate(limit);

    Ok(Window { rows, has_more })
}
