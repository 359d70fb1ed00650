//! Page assembly: outgoing cursors, counts and navigation links

use crate::core::entity::Entity;
use crate::core::error::PaginationError;
use crate::core::query::CURSOR_PARAM;
use crate::pagination::cursor::{Cursor, CursorCodec, CursorOperator, SortField};
use crate::pagination::executor::Window;
use serde::Serialize;

/// A cursor as received from the client: the raw token and what it decodes to
#[derive(Debug, Clone)]
pub struct IncomingCursor {
    pub token: String,
    pub cursor: Cursor,
}

/// One page of a collection
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Token reproducing the previous page; `None` means "start over"
    pub previous_cursor: Option<String>,

    /// Token of the next page; `None` on the last page
    pub next_cursor: Option<String>,

    pub count: usize,

    pub previous_url: Option<String>,

    pub next_url: Option<String>,
}

impl<T> Page<T> {
    /// Attach navigable URLs
    ///
    /// `params` are the request's query pairs without its cursor. The first
    /// page (`had_cursor == false`) has no previous link; a later page whose
    /// previous cursor is `None` links back to the cursor-less URL.
    pub fn with_links(
        mut self,
        base_url: &str,
        params: &[(String, String)],
        had_cursor: bool,
    ) -> Result<Self, PaginationError> {
        self.next_url = match &self.next_cursor {
            Some(token) => Some(link(base_url, params, Some(token))?),
            None => None,
        };
        self.previous_url = if had_cursor {
            Some(link(base_url, params, self.previous_cursor.as_deref())?)
        } else {
            None
        };
        Ok(self)
    }
}

fn link(
    base_url: &str,
    params: &[(String, String)],
    cursor: Option<&str>,
) -> Result<String, PaginationError> {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .filter(|(key, _)| key != CURSOR_PARAM)
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    if let Some(cursor) = cursor {
        pairs.push((CURSOR_PARAM, cursor));
    }

    let query =
        serde_urlencoded::to_string(&pairs).map_err(|e| PaginationError::CursorEncoding {
            message: e.to_string(),
        })?;

    if query.is_empty() {
        Ok(base_url.to_string())
    } else {
        Ok(format!("{}?{}", base_url, query))
    }
}

/// Turn a window of rows into a page
///
/// The next cursor points at the last emitted row, keeps the walking
/// direction of the incoming cursor and links back to the incoming token.
pub fn assemble<T: Entity>(
    window: Window<T>,
    incoming: Option<&IncomingCursor>,
    sort_field: &SortField,
    codec: &CursorCodec,
) -> Result<Page<T>, PaginationError> {
    let next_cursor = match window.rows.last() {
        Some(last) if window.has_more => {
            let cursor = Cursor {
                previous_cursor: incoming.map(|incoming| incoming.token.clone()),
                sort_field_key: sort_field.key.clone(),
                operator: incoming
                    .map(|incoming| incoming.cursor.operator.continuation())
                    .unwrap_or(CursorOperator::Ge),
                value: sort_field.value_of(last.field_value(&sort_field.key))?,
                tie_break_id: last.unique_id(),
            };
            Some(codec.encode(&cursor)?)
        }
        _ => None,
    };

    let previous_cursor = incoming.and_then(|incoming| incoming.cursor.previous_cursor.clone());
    let count = window.rows.len();

    Ok(Page {
        items: window.rows,
        previous_cursor,
        next_cursor,
        count,
        previous_url: None,
        next_url: None,
    })
}
