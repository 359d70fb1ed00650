//! Query parameters for paginated list endpoints

use crate::core::error::{PaginationError, ValidationError};
use crate::pagination::registry::{FilterParams, FilterValue};
use serde::{Deserialize, Serialize};

/// Query-string key carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query-string key carrying the opaque cursor token
pub const CURSOR_PARAM: &str = "cursor";

/// Default and maximum page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitPolicy {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "max_limit")]
    pub max_limit: usize,
}

fn default_limit() -> usize {
    20
}

fn max_limit() -> usize {
    100
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: max_limit(),
        }
    }
}

impl LimitPolicy {
    /// Resolve the requested page size
    ///
    /// A missing limit falls back to the default, a limit above the maximum
    /// is clamped, and zero is rejected.
    pub fn resolve(&self, requested: Option<usize>) -> Result<usize, PaginationError> {
        match requested {
            None => Ok(self.default_limit.min(self.max_limit)),
            Some(0) => Err(PaginationError::InvalidLimit {
                limit: 0,
                max: self.max_limit,
            }),
            Some(limit) => Ok(limit.min(self.max_limit)),
        }
    }
}

/// Parsed query string of a paginated list request
///
/// # Example
/// ```text
/// GET /profiles?limit=10&courses_in=1&courses_in=2&display_name_ilike=ana
/// GET /profiles?limit=10&courses_in=1&courses_in=2&cursor=eyJ0eXAi...
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Requested page size, if any
    pub limit: Option<usize>,

    /// Incoming cursor token, if any
    pub cursor: Option<String>,

    /// Every other non-empty parameter, grouped by name
    pub filters: FilterParams,

    /// All pairs except the cursor, in request order, for building links
    pub passthrough: Vec<(String, String)>,
}

impl ListQuery {
    /// Build from raw `key=value` pairs
    ///
    /// Repeated keys (`courses_in=1&courses_in=2`) become a multi-valued
    /// filter. Empty values are ignored, as an absent filter would be.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ValidationError> {
        let mut query = ListQuery::default();

        for (key, value) in pairs {
            match key.as_str() {
                CURSOR_PARAM => {
                    if !value.is_empty() {
                        query.cursor = Some(value);
                    }
                    continue;
                }
                LIMIT_PARAM => {
                    let limit = value.parse::<usize>().map_err(|_| ValidationError::Field {
                        field: LIMIT_PARAM.to_string(),
                        message: format!("'{}' is not a non-negative integer", value),
                    })?;
                    query.limit = Some(limit);
                }
                _ if value.is_empty() => {}
                _ => {
                    let merged = match query.filters.remove(&key) {
                        None => FilterValue::Single(value.clone()),
                        Some(existing) => existing.push(value.clone()),
                    };
                    query.filters.insert(key.clone(), merged);
                }
            }
            query.passthrough.push((key, value));
        }

        Ok(query)
    }
}
