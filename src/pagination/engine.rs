//! Paginator: filters, cursor and limit in, one page out

use crate::core::entity::Entity;
use crate::core::error::PaginationError;
use crate::core::query::LimitPolicy;
use crate::core::service::QueryExecutor;
use crate::entities::profile;
use crate::pagination::assembler::{self, IncomingCursor, Page};
use crate::pagination::cursor::{CursorCodec, SortField, SortFieldType};
use crate::pagination::executor;
use crate::pagination::registry::{FilterParams, FilterRegistry, PROFILE_FILTERS};
use std::marker::PhantomData;

/// How a collection may be filtered and ordered
#[derive(Debug)]
pub struct Collection {
    pub resource: &'static str,

    /// Sortable fields; the first one is the default ordering
    pub sortable: &'static [(&'static str, SortFieldType)],

    pub filters: &'static FilterRegistry,
}

impl Collection {
    pub fn default_sort(&self) -> Result<SortField, PaginationError> {
        self.sortable
            .first()
            .map(|(key, field_type)| SortField::new(*key, *field_type))
            .ok_or_else(|| PaginationError::Configuration {
                message: format!("{} declares no sortable field", self.resource),
            })
    }

    /// Sort field named by a cursor, if the collection allows it
    pub fn sort_field(&self, field: &SortField) -> Option<SortField> {
        self.sortable
            .iter()
            .find(|(key, field_type)| *key == field.key && *field_type == field.field_type)
            .map(|(key, field_type)| SortField::new(*key, *field_type))
    }
}

/// Profiles: by display name, ties broken by id
pub static PROFILES: Collection = Collection {
    resource: "profiles",
    sortable: &[
        (profile::fields::DISPLAY_NAME, SortFieldType::Str),
        (profile::fields::ID, SortFieldType::Int),
    ],
    filters: &PROFILE_FILTERS,
};

/// Pages through one collection
///
/// A short-lived value borrowing everything it needs; build one per request.
pub struct Paginator<'a, T: Entity, E: QueryExecutor<T> + ?Sized> {
    collection: &'a Collection,
    codec: &'a CursorCodec,
    store: &'a E,
    limits: LimitPolicy,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T, E> Paginator<'a, T, E>
where
    T: Entity,
    E: QueryExecutor<T> + ?Sized,
{
    pub fn new(collection: &'a Collection, codec: &'a CursorCodec, store: &'a E) -> Self {
        Self {
            collection,
            codec,
            store,
            limits: LimitPolicy::default(),
            _entity: PhantomData,
        }
    }

    pub fn with_limits(mut self, limits: LimitPolicy) -> Self {
        self.limits = limits;
        self
    }

    /// Fetch the page selected by `filters`, `cursor_token` and `limit`
    ///
    /// Without a token this is the first page. A token fixes the ordering
    /// and the position; the filters must be repeated on every request.
    pub async fn paginate(
        &self,
        filters: &FilterParams,
        cursor_token: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<T>, PaginationError> {
        let limit = self.limits.resolve(limit)?;
        let predicates = self.collection.filters.resolve_all(filters)?;

        let incoming = match cursor_token {
            Some(token) => Some(self.decode(token)?),
            None => None,
        };

        let sort_field = match &incoming {
            Some(incoming) => incoming.cursor.sort_field(),
            None => self.collection.default_sort()?,
        };

        tracing::debug!(
            resource = self.collection.resource,
            filters = predicates.len(),
            cursor = incoming.is_some(),
            sort_field = %sort_field.key,
            limit,
            "paginating"
        );

        let window = executor::fetch(
            self.store,
            predicates,
            incoming.as_ref().map(|incoming| &incoming.cursor),
            &sort_field,
            limit,
        )
        .await?;

        tracing::debug!(
            resource = self.collection.resource,
            rows = window.rows.len(),
            has_more = window.has_more,
            "page fetched"
        );

        assembler::assemble(window, incoming.as_ref(), &sort_field, self.codec)
    }

    fn decode(&self, token: &str) -> Result<IncomingCursor, PaginationError> {
        let cursor = self.codec.decode(token).inspect_err(|e| {
            tracing::warn!(resource = self.collection.resource, error = %e, "cursor rejected");
        })?;

        if self.collection.sort_field(&cursor.sort_field()).is_none() {
            tracing::warn!(
                resource = self.collection.resource,
                sort_field = %cursor.sort_field_key,
                "cursor names a field the collection does not sort by"
            );
            return Err(PaginationError::invalid_cursor(format!(
                "'{}' is not a sortable field of {}",
                cursor.sort_field_key, self.collection.resource
            )));
        }

        Ok(IncomingCursor {
            token: token.to_string(),
            cursor,
        })
    }
}
