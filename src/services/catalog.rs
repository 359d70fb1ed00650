//! Courses, interests and contact types

use super::stores::Stores;
use crate::core::error::StorageError;
use crate::entities::{ContactType, Course, Interest};

/// Read access to the reference catalogs
#[derive(Clone)]
pub struct CatalogService {
    stores: Stores,
}

impl CatalogService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        self.stores.courses.list().await
    }

    pub async fn list_interests(&self) -> Result<Vec<Interest>, StorageError> {
        self.stores.interests.list().await
    }

    pub async fn list_contact_types(&self) -> Result<Vec<ContactType>, StorageError> {
        self.stores.contact_types.list().await
    }
}
