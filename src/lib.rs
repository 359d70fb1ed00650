//! # Profiles
//!
//! A microservice for user profiles, the courses they follow and the
//! interests they declare, with keyset pagination over signed cursors.
//!
//! ## Features
//!
//! - **Keyset Pagination**: Pages are positioned by the last row seen, not by
//!   offset, so concurrent inserts and deletes never duplicate or skip rows
//! - **Signed Cursors**: Positions travel as HMAC-signed JWTs
//! - **Composable Filters**: Named filters resolve to predicates and combine
//!   by conjunction
//! - **Storage-Agnostic Core**: The engine only needs a [`QueryExecutor`]
//! - **Configuration-Based**: YAML file plus environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use profiles::prelude::*;
//!
//! let store = InMemoryStore::<Profile>::new();
//! let codec = CursorCodec::from_secret("secret", "HS256")?;
//!
//! let paginator = Paginator::new(&PROFILES, &codec, &store);
//! let first = paginator.paginate(&FilterParams::new(), None, Some(10)).await?;
//!
//! if let Some(token) = first.next_cursor.as_deref() {
//!     let second = paginator.paginate(&FilterParams::new(), Some(token), Some(10)).await?;
//! }
//! ```
//!
//! [`QueryExecutor`]: crate::core::service::QueryExecutor

pub mod config;
pub mod core;
pub mod entities;
pub mod pagination;
pub mod server;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::Entity,
        error::{PaginationError, ResourceError, ServiceError, StorageError, ValidationError},
        field::FieldValue,
        predicate::{Operator, OrderBy, Predicate, SortDirection},
        query::{LimitPolicy, ListQuery},
        service::{DataService, QueryExecutor, RowEdit},
    };

    // === Entities ===
    pub use crate::entities::{
        ContactType, Course, CreateProfileInput, EmailInput, Interest, PatchEmailInput,
        PatchPhoneInput, PatchProfileInput, PhoneInput, PhoneView, Profile, ProfileEmail,
        ProfilePhone, ProfileView,
    };

    // === Pagination ===
    pub use crate::pagination::{
        Cursor, CursorCodec, CursorOperator, FilterParams, FilterRegistry, FilterValue,
        PROFILE_FILTERS, PROFILES, Page, Paginator, SortField, SortFieldType, SortValue,
    };

    // === Services ===
    pub use crate::services::{CatalogService, ContactService, ProfileService, Stores};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, seed_demo_data};

    // === Config ===
    pub use crate::config::{CursorConfig, ServerConfig, ServiceConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_routes, extract::JsonBody};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use uuid::Uuid;
}
