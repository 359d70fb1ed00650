//! HTTP surface of the service
//!
//! [`ServerBuilder`] validates the configuration, wires the stores into the
//! services and exposes them through the routes of [`router`].

pub mod builder;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use router::build_routes;
pub use state::AppState;
