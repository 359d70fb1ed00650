//! Shared application state

use crate::services::{CatalogService, ContactService, ProfileService};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileService,
    pub contacts: ContactService,
    pub catalog: CatalogService,

    /// Base of the URLs placed in pagination links, without trailing slash
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        profiles: ProfileService,
        contacts: ContactService,
        catalog: CatalogService,
        base_url: &str,
    ) -> Self {
        Self {
            profiles,
            contacts,
            catalog,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
