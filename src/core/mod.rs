//! Core module containing fundamental traits and types of the service

pub mod entity;
pub mod error;
pub mod field;
pub mod predicate;
pub mod query;
pub mod service;

pub use entity::Entity;
pub use error::{
    ErrorResponse, PaginationError, ResourceError, ServiceError, StorageError, ValidationError,
};
pub use field::FieldValue;
pub use predicate::{Operator, OrderBy, Predicate, SortDirection};
pub use query::{LimitPolicy, ListQuery};
pub use service::{DataService, QueryExecutor};
