//! Typed error handling for the profiles service
//!
//! This module provides the error hierarchy used across the crate so that
//! callers can match on specific failures rather than dealing with generic
//! `anyhow::Error` values.
//!
//! # Error Categories
//!
//! - [`PaginationError`]: filter resolution, cursor codec and paging errors
//! - [`StorageError`]: errors raised by storage backends
//! - [`ResourceError`]: missing or conflicting resources
//! - [`ValidationError`]: malformed request input
//!
//! [`ServiceError`] wraps all of them and knows how to render itself as an
//! HTTP response.
//!
//! # Example
//!
//! ```rust,ignore
//! match service.list_profiles(&filters, cursor, limit).await {
//!     Ok(page) => println!("{} profiles", page.count),
//!     Err(ServiceError::Pagination(PaginationError::InvalidCursor { .. })) => {
//!         // restart from the first page
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// The main error type of the service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Pagination errors (filters, cursors, limits)
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// Resource lookup and conflict errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Request validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Pagination(e) => e.status_code(),
            ServiceError::Resource(e) => e.status_code(),
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Pagination(e) => e.error_code(),
            ServiceError::Resource(e) => e.error_code(),
            ServiceError::Validation(_) => "REQUEST_VALIDATION_ERROR",
            ServiceError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::Pagination(PaginationError::UnknownFilter { name }) => {
                Some(serde_json::json!({ "filter": name }))
            }
            ServiceError::Pagination(PaginationError::InvalidFilterValue { name, value, .. }) => {
                Some(serde_json::json!({ "filter": name, "value": value }))
            }
            ServiceError::Validation(ValidationError::Field { field, .. }) => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::warn!(error = %self, code = self.error_code(), "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Pagination Errors
// =============================================================================

/// Errors raised while resolving filters, decoding cursors or paging
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The filter name is not registered for this collection
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },

    /// The filter is registered but its raw value cannot be interpreted
    #[error("Invalid value '{value}' for filter '{name}': {message}")]
    InvalidFilterValue {
        name: String,
        value: String,
        message: String,
    },

    /// The cursor token failed integrity checks or is malformed
    #[error("Invalid cursor: {reason}")]
    InvalidCursor { reason: String },

    /// A sort field has no matching comparator for its values
    #[error("Unsupported sort type '{sort_type}' for field '{field}'")]
    UnsupportedSortType { field: String, sort_type: String },

    /// The requested page size is not a positive integer
    #[error("Invalid page limit {limit}: must be between 1 and {max}")]
    InvalidLimit { limit: usize, max: usize },

    /// Signing keys or algorithm are unusable
    #[error("Invalid cursor signing configuration: {message}")]
    Configuration { message: String },

    /// Cursor serialization failed
    #[error("Failed to encode cursor: {message}")]
    CursorEncoding { message: String },

    /// Storage failure, propagated unmodified
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PaginationError {
    pub fn invalid_cursor(reason: impl Into<String>) -> Self {
        PaginationError::InvalidCursor {
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by client input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaginationError::UnknownFilter { .. }
                | PaginationError::InvalidFilterValue { .. }
                | PaginationError::InvalidCursor { .. }
                | PaginationError::InvalidLimit { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PaginationError::UnknownFilter { .. } => "UNKNOWN_FILTER",
            PaginationError::InvalidFilterValue { .. } => "INVALID_FILTER_VALUE",
            PaginationError::InvalidCursor { .. } => "INVALID_CURSOR",
            PaginationError::UnsupportedSortType { .. } => "UNSUPPORTED_SORT_TYPE",
            PaginationError::InvalidLimit { .. } => "INVALID_LIMIT",
            PaginationError::Configuration { .. } => "CURSOR_CONFIGURATION_ERROR",
            PaginationError::CursorEncoding { .. } => "CURSOR_ENCODING_ERROR",
            PaginationError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// A lock guarding the backend was poisoned
    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },

    /// Update of a row that does not exist
    #[error("{resource} with id {id} does not exist")]
    MissingRow { resource: String, id: i64 },

    /// The backend cannot evaluate the predicate it was given
    #[error("Unsupported predicate: {message}")]
    UnsupportedPredicate { message: String },

    /// Generic backend failure
    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

// =============================================================================
// Resource Errors
// =============================================================================

/// Missing or conflicting resources
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("Profile '{guid}' was not found")]
    ProfileNotFound { guid: Uuid },

    #[error("No profile was found for user '{user_guid}'")]
    UserProfileNotFound { user_guid: Uuid },

    #[error("A profile already exists for user '{user_guid}'")]
    ProfileConflict { user_guid: Uuid },

    #[error("Course {id} was not found")]
    CourseNotFound { id: i64 },

    #[error("Interest {id} was not found")]
    InterestNotFound { id: i64 },

    #[error("Profile '{guid}' is already linked to course {course_id}")]
    CourseLinkConflict { guid: Uuid, course_id: i64 },

    #[error("Profile '{guid}' is not linked to course {course_id}")]
    CourseLinkNotFound { guid: Uuid, course_id: i64 },

    #[error("Profile '{guid}' is already linked to interest {interest_id}")]
    InterestLinkConflict { guid: Uuid, interest_id: i64 },

    #[error("Profile '{guid}' is not linked to interest {interest_id}")]
    InterestLinkNotFound { guid: Uuid, interest_id: i64 },

    #[error("E-mail '{guid}' was not found")]
    EmailNotFound { guid: Uuid },

    #[error("Phone '{guid}' was not found")]
    PhoneNotFound { guid: Uuid },

    #[error("Contact type {id} was not found")]
    ContactTypeNotFound { id: i64 },
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::ProfileNotFound { .. }
            | ResourceError::UserProfileNotFound { .. }
            | ResourceError::CourseNotFound { .. }
            | ResourceError::InterestNotFound { .. }
            | ResourceError::CourseLinkNotFound { .. }
            | ResourceError::InterestLinkNotFound { .. }
            | ResourceError::EmailNotFound { .. }
            | ResourceError::PhoneNotFound { .. }
            | ResourceError::ContactTypeNotFound { .. } => StatusCode::NOT_FOUND,
            ResourceError::ProfileConflict { .. }
            | ResourceError::CourseLinkConflict { .. }
            | ResourceError::InterestLinkConflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ResourceError::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            ResourceError::UserProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            ResourceError::ProfileConflict { .. } => "PROFILE_CONFLICT",
            ResourceError::CourseNotFound { .. } => "COURSE_NOT_FOUND",
            ResourceError::InterestNotFound { .. } => "INTEREST_NOT_FOUND",
            ResourceError::CourseLinkConflict { .. } => "COURSE_LINK_CONFLICT",
            ResourceError::CourseLinkNotFound { .. } => "COURSE_LINK_NOT_FOUND",
            ResourceError::InterestLinkConflict { .. } => "INTEREST_LINK_CONFLICT",
            ResourceError::InterestLinkNotFound { .. } => "INTEREST_LINK_NOT_FOUND",
            ResourceError::EmailNotFound { .. } => "PROFILE_EMAIL_NOT_FOUND",
            ResourceError::PhoneNotFound { .. } => "PROFILE_PHONE_NOT_FOUND",
            ResourceError::ContactTypeNotFound { .. } => "CONTACT_TYPE_NOT_FOUND",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Invalid field '{field}': {message}")]
    Field { field: String, message: String },

    /// Validation failures reported by `validator`
    #[error("Request validation failed: {0}")]
    Input(String),

    /// The request body is not the expected JSON document
    #[error("Invalid request body: {0}")]
    Body(String),

    /// The query string cannot be parsed
    #[error("Invalid query string: {0}")]
    Query(String),
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ValidationError::Input(errors.to_string())
    }
}
