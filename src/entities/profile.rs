//! User profiles

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use crate::entities::{Course, Interest, PhoneView, ProfileEmail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;
use validator::Validate;

/// Attribute names usable in predicates and orderings
pub mod fields {
    pub const ID: &str = "id";
    pub const GUID: &str = "guid";
    pub const USER_GUID: &str = "user_guid";
    pub const DISPLAY_NAME: &str = "display_name";
    pub const DISPLAY_NAME_NORMALIZED: &str = "display_name_normalized";
    pub const BIO: &str = "bio";

    /// One value per linked course
    pub const COURSE_ID: &str = "course_id";

    /// One value per linked interest
    pub const INTEREST_ID: &str = "interest_id";
}

/// Strip accents by compatibility decomposition, keeping ASCII only
///
/// Case is preserved; matching on the result is case-insensitive anyway.
pub fn normalize_text(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub guid: Uuid,
    pub user_guid: Uuid,
    pub display_name: String,
    pub display_name_normalized: String,
    pub bio: Option<String>,
    pub course_ids: Vec<i64>,
    pub interest_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh profile for `user_guid`, without an id
    pub fn new(user_guid: Uuid, display_name: impl Into<String>, bio: Option<String>) -> Self {
        let display_name = display_name.into();
        let now = Utc::now();
        Self {
            id: 0,
            guid: Uuid::new_v4(),
            user_guid,
            display_name_normalized: normalize_text(&display_name),
            display_name,
            bio,
            course_ids: Vec::new(),
            interest_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
        self.display_name_normalized = normalize_text(&self.display_name);
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Profile {
    fn resource_name() -> &'static str {
        "profiles"
    }

    fn unique_id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn field_values(&self, field: &str) -> Vec<FieldValue> {
        match field {
            fields::ID => vec![FieldValue::Integer(self.id)],
            fields::GUID => vec![FieldValue::String(self.guid.to_string())],
            fields::USER_GUID => vec![FieldValue::String(self.user_guid.to_string())],
            fields::DISPLAY_NAME => vec![FieldValue::String(self.display_name.clone())],
            fields::DISPLAY_NAME_NORMALIZED => {
                vec![FieldValue::String(self.display_name_normalized.clone())]
            }
            fields::BIO => vec![FieldValue::from(self.bio.clone())],
            fields::COURSE_ID => self.course_ids.iter().copied().map(FieldValue::Integer).collect(),
            fields::INTEREST_ID => self
                .interest_ids
                .iter()
                .copied()
                .map(FieldValue::Integer)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Body of `POST /profiles`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProfileInput {
    pub user_guid: Uuid,

    #[validate(length(min = 1, max = 120))]
    pub display_name: String,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,
}

/// Body of `PATCH /profiles/{guid}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchProfileInput {
    #[validate(length(min = 1, max = 120))]
    pub display_name: Option<String>,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,
}

/// A profile with its courses, interests and contacts expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub id: i64,
    pub guid: Uuid,
    pub user_guid: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub courses: Vec<Course>,
    pub interests: Vec<Interest>,
    pub emails: Vec<ProfileEmail>,
    pub phones: Vec<PhoneView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileView {
    pub fn new(
        profile: Profile,
        courses: Vec<Course>,
        interests: Vec<Interest>,
        emails: Vec<ProfileEmail>,
        phones: Vec<PhoneView>,
    ) -> Self {
        Self {
            id: profile.id,
            guid: profile.guid,
            user_guid: profile.user_guid,
            display_name: profile.display_name,
            bio: profile.bio,
            courses,
            interests,
            emails,
            phones,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
