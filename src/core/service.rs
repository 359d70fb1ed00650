//! Storage traits for data entities
//!
//! The framework is agnostic to the underlying storage mechanism: the
//! pagination engine only needs [`QueryExecutor`], the resource services
//! need the CRUD surface of [`DataService`].

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::predicate::{OrderBy, Predicate};
use async_trait::async_trait;

/// Executes a filtered, ordered, limited read
///
/// This is the single suspension point of a pagination request. Retry and
/// timeout policies belong to implementations, not to callers.
#[async_trait]
pub trait QueryExecutor<T: Entity>: Send + Sync {
    /// Return at most `limit` entities matching `predicate`, ordered by
    /// `order_by.sort_field` then `order_by.unique_id` in `order_by.direction`
    async fn execute_query(
        &self,
        predicate: &Predicate,
        order_by: &OrderBy,
        limit: usize,
    ) -> Result<Vec<T>, StorageError>;
}

/// In-place edit applied by [`DataService::modify`]
///
/// Returns whether the edited row should be kept; `false` discards the edit.
pub type RowEdit<'e, T> = Box<dyn FnOnce(&mut T) -> bool + Send + 'e>;

/// Service trait for managing data entities
///
/// Implementations provide CRUD operations for a specific entity type.
#[async_trait]
pub trait DataService<T: Entity>: QueryExecutor<T> {
    /// Insert a new entity, allocating its unique id
    async fn create(&self, entity: T) -> Result<T, StorageError>;

    /// Get an entity by its unique id
    async fn get(&self, id: i64) -> Result<Option<T>, StorageError>;

    /// List all entities in id order
    async fn list(&self) -> Result<Vec<T>, StorageError>;

    /// Replace an existing entity
    async fn update(&self, entity: T) -> Result<T, StorageError>;

    /// Apply `edit` to the entity with id `id` without interleaving other writes
    ///
    /// Returns the entity as stored afterwards, or `None` if no row has that id.
    async fn modify<'e>(&self, id: i64, edit: RowEdit<'e, T>) -> Result<Option<T>, StorageError>;

    /// Insert `entity` unless some row already matches `existing`
    ///
    /// The check and the insert happen under one write. Returns `None`
    /// when a matching row exists.
    async fn create_if_absent(
        &self,
        entity: T,
        existing: &Predicate,
    ) -> Result<Option<T>, StorageError>;

    /// Delete an entity by its unique id
    async fn delete(&self, id: i64) -> Result<(), StorageError>;

    /// All entities matching a predicate, in id order
    async fn find(&self, predicate: &Predicate) -> Result<Vec<T>, StorageError>;

    /// First entity matching a predicate
    async fn find_one(&self, predicate: &Predicate) -> Result<Option<T>, StorageError> {
        Ok(self.find(predicate).await?.into_iter().next())
    }
}
