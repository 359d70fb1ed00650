//! E-mail addresses and phone numbers attached to a profile
//!
//! Both are addressed by their own GUID and always scoped to their owning
//! profile: a contact of another profile is reported as not found.

use crate::core::entity::Entity;
use crate::core::field::FieldValue;
use crate::entities::ContactType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Attribute names shared by e-mails and phones
pub mod fields {
    pub const ID: &str = "id";
    pub const GUID: &str = "guid";
    pub const PROFILE_ID: &str = "profile_id";
    pub const CONTACT_TYPE_ID: &str = "contact_type_id";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEmail {
    #[serde(skip)]
    pub id: i64,
    pub guid: Uuid,
    #[serde(skip)]
    pub profile_id: i64,
    pub email: String,
}

impl ProfileEmail {
    pub fn new(profile_id: i64, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            guid: Uuid::new_v4(),
            profile_id,
            email: email.into(),
        }
    }
}

impl Entity for ProfileEmail {
    fn resource_name() -> &'static str {
        "emails"
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
            fields::PROFILE_ID => vec![FieldValue::Integer(self.profile_id)],
            "email" => vec![FieldValue::String(self.email.clone())],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePhone {
    pub id: i64,
    pub guid: Uuid,
    pub profile_id: i64,
    pub phone: String,
    pub contact_type_id: Option<i64>,
}

impl ProfilePhone {
    pub fn new(profile_id: i64, phone: impl Into<String>, contact_type_id: Option<i64>) -> Self {
        Self {
            id: 0,
            guid: Uuid::new_v4(),
            profile_id,
            phone: phone.into(),
            contact_type_id,
        }
    }
}

impl Entity for ProfilePhone {
    fn resource_name() -> &'static str {
        "phones"
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
            fields::PROFILE_ID => vec![FieldValue::Integer(self.profile_id)],
            fields::CONTACT_TYPE_ID => vec![FieldValue::from(self.contact_type_id)],
            "phone" => vec![FieldValue::String(self.phone.clone())],
            _ => Vec::new(),
        }
    }
}

/// A phone with its contact type expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneView {
    pub guid: Uuid,
    pub phone: String,
    pub contact_type: Option<ContactType>,
}

impl PhoneView {
    pub fn new(phone: ProfilePhone, contact_type: Option<ContactType>) -> Self {
        Self {
            guid: phone.guid,
            phone: phone.phone,
            contact_type,
        }
    }
}

/// Body of `POST /profiles/{guid}/emails`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailInput {
    #[validate(email)]
    pub email: String,
}

/// Body of `PATCH /profiles/{guid}/emails/{email_guid}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchEmailInput {
    #[validate(email)]
    pub email: Option<String>,
}

/// Body of `POST /profiles/{guid}/phones`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PhoneInput {
    #[validate(length(min = 1, max = 32))]
    pub phone: String,

    pub contact_type_id: Option<i64>,
}

/// Body of `PATCH /profiles/{guid}/phones/{phone_guid}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchPhoneInput {
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,

    pub contact_type_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_serializes_without_keys() {
        let email = ProfileEmail::new(3, "ana@example.com");
        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(value["email"], "ana@example.com");
        assert!(value.get("id").is_none());
        assert!(value.get("profile_id").is_none());
    }

    #[test]
    fn test_untyped_phone_has_null_type() {
        let phone = ProfilePhone::new(1, "+55 11 91234-5678", None);
        assert_eq!(
            phone.field_values(fields::CONTACT_TYPE_ID),
            vec![FieldValue::Null]
        );
    }

    #[test]
    fn test_contact_inputs_are_validated() {
        let email = EmailInput {
            email: "not-an-address".to_string(),
        };
        assert!(email.validate().is_err());

        let patch = PatchEmailInput { email: None };
        assert!(patch.validate().is_ok());

        let phone = PhoneInput {
            phone: String::new(),
            contact_type_id: None,
        };
        assert!(phone.validate().is_err());
    }
}
