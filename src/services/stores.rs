//! The storage handles shared by the resource services

use crate::core::error::{ResourceError, ServiceError, ValidationError};
use crate::core::predicate::Predicate;
use crate::core::service::DataService;
use crate::entities::profile::fields;
use crate::entities::{ContactType, Course, Interest, Profile, ProfileEmail, ProfilePhone};
use crate::storage::InMemoryStore;
use std::sync::Arc;
use uuid::Uuid;

/// One store per resource
///
/// Cloning is cheap: every handle is reference counted and clones share rows.
#[derive(Clone)]
pub struct Stores {
    pub profiles: Arc<dyn DataService<Profile>>,
    pub courses: Arc<dyn DataService<Course>>,
    pub interests: Arc<dyn DataService<Interest>>,
    pub emails: Arc<dyn DataService<ProfileEmail>>,
    pub phones: Arc<dyn DataService<ProfilePhone>>,
    pub contact_types: Arc<dyn DataService<ContactType>>,
}

impl Stores {
    /// Empty in-memory stores
    pub fn in_memory() -> Self {
        Self {
            profiles: Arc::new(InMemoryStore::<Profile>::new()),
            courses: Arc::new(InMemoryStore::<Course>::new()),
            interests: Arc::new(InMemoryStore::<Interest>::new()),
            emails: Arc::new(InMemoryStore::<ProfileEmail>::new()),
            phones: Arc::new(InMemoryStore::<ProfilePhone>::new()),
            contact_types: Arc::new(InMemoryStore::<ContactType>::new()),
        }
    }

    pub(crate) async fn require_profile(&self, guid: Uuid) -> Result<Profile, ServiceError> {
        self.profiles
            .find_one(&Predicate::eq(fields::GUID, guid.to_string()))
            .await?
            .ok_or_else(|| ResourceError::ProfileNotFound { guid }.into())
    }

    pub(crate) async fn require_course(&self, id: i64) -> Result<Course, ServiceError> {
        self.courses
            .get(id)
            .await?
            .ok_or_else(|| ResourceError::CourseNotFound { id }.into())
    }

    pub(crate) async fn require_interest(&self, id: i64) -> Result<Interest, ServiceError> {
        self.interests
            .get(id)
            .await?
            .ok_or_else(|| ResourceError::InterestNotFound { id }.into())
    }

    pub(crate) async fn require_contact_type(&self, id: i64) -> Result<ContactType, ServiceError> {
        self.contact_types
            .get(id)
            .await?
            .ok_or_else(|| ResourceError::ContactTypeNotFound { id }.into())
    }
}

impl Default for Stores {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Trim `value`, rejecting text that is blank once trimmed
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Field {
            field: field.to_string(),
            message: "must not be blank".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
