//! Entity trait defining the core abstraction for all stored resources

use crate::core::field::FieldValue;

/// Base trait for all entities in the system.
///
/// Every entity has a unique integer key that doubles as the tie-break
/// column of keyset pagination, and exposes its attributes by name so that
/// storage backends can evaluate predicates and orderings generically.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "profiles", "courses")
    fn resource_name() -> &'static str;

    /// Name of the unique key attribute
    fn unique_id_field() -> &'static str {
        "id"
    }

    /// The unique key of this instance
    fn unique_id(&self) -> i64;

    /// Set the unique key, used by stores that allocate ids on insert
    fn assign_id(&mut self, id: i64);

    /// All values of a named attribute
    ///
    /// Scalar attributes yield at most one value; relationship attributes
    /// (e.g. the course ids of a profile) yield one value per related row.
    /// Unknown attributes yield nothing.
    fn field_values(&self, field: &str) -> Vec<FieldValue>;

    /// First value of a named attribute
    fn field_value(&self, field: &str) -> Option<FieldValue> {
        self.field_values(field).into_iter().next()
    }
}
