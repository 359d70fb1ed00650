//! Resource services: the operations behind the HTTP routes

pub mod catalog;
pub mod contact_service;
pub mod profile_service;
pub mod stores;

pub use catalog::CatalogService;
pub use contact_service::ContactService;
pub use profile_service::ProfileService;
pub use stores::Stores;
