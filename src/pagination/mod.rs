//! Keyset pagination with composable filters
//!
//! A request flows through the pieces in order:
//!
//! 1. [`registry`] resolves query filters into predicates
//! 2. [`cursor`] verifies and decodes the incoming token
//! 3. [`predicate_builder`] turns the cursor into a seek predicate
//! 4. [`executor`] runs one over-fetching read
//! 5. [`assembler`] trims the rows and signs the next cursor
//!
//! [`engine::Paginator`] wires them together.

pub mod assembler;
pub mod cursor;
pub mod engine;
pub mod executor;
pub mod predicate_builder;
pub mod registry;

pub use assembler::{IncomingCursor, Page};
pub use cursor::{Cursor, CursorCodec, CursorOperator, SortField, SortFieldType, SortValue};
pub use engine::{Collection, PROFILES, Paginator};
pub use executor::Window;
pub use registry::{FilterParams, FilterRegistry, FilterValue, PROFILE_FILTERS};
