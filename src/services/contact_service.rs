//! E-mails and phones of a profile

use super::stores::{Stores, required_text};
use crate::core::error::{ResourceError, ServiceError, ValidationError};
use crate::core::predicate::Predicate;
use crate::core::service::DataService;
use crate::entities::contact::fields;
use crate::entities::{
    EmailInput, PatchEmailInput, PatchPhoneInput, PhoneInput, PhoneView, ProfileEmail,
    ProfilePhone,
};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct ContactService {
    stores: Stores,
}

impl ContactService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn add_email(
        &self,
        guid: Uuid,
        input: EmailInput,
    ) -> Result<ProfileEmail, ServiceError> {
        input.validate().map_err(ValidationError::from)?;
        let email = required_text("email", &input.email)?;
        let profile = self.stores.require_profile(guid).await?;

        let email = self
            .stores
            .emails
            .create(ProfileEmail::new(profile.id, email))
            .await?;
        tracing::info!(guid = %guid, email_guid = %email.guid, "e-mail added");
        Ok(email)
    }

    pub async fn patch_email(
        &self,
        guid: Uuid,
        email_guid: Uuid,
        input: PatchEmailInput,
    ) -> Result<ProfileEmail, ServiceError> {
        input.validate().map_err(ValidationError::from)?;
        let address = input
            .email
            .as_deref()
            .map(|email| required_text("email", email))
            .transpose()?;
        let email = self.require_email(guid, email_guid).await?;

        let email = self
            .stores
            .emails
            .modify(
                email.id,
                Box::new(move |row: &mut ProfileEmail| {
                    if let Some(address) = address {
                        row.email = address;
                    }
                    true
                }),
            )
            .await?
            .ok_or(ResourceError::EmailNotFound { guid: email_guid })?;
        tracing::info!(guid = %guid, email_guid = %email_guid, "e-mail updated");
        Ok(email)
    }

    pub async fn delete_email(&self, guid: Uuid, email_guid: Uuid) -> Result<(), ServiceError> {
        let email = self.require_email(guid, email_guid).await?;
        self.stores.emails.delete(email.id).await?;
        tracing::info!(guid = %guid, email_guid = %email_guid, "e-mail deleted");
        Ok(())
    }

    pub async fn add_phone(&self, guid: Uuid, input: PhoneInput) -> Result<PhoneView, ServiceError> {
        input.validate().map_err(ValidationError::from)?;
        let number = required_text("phone", &input.phone)?;
        let profile = self.stores.require_profile(guid).await?;
        let contact_type = match input.contact_type_id {
            Some(id) => Some(self.stores.require_contact_type(id).await?),
            None => None,
        };

        let phone = self
            .stores
            .phones
            .create(ProfilePhone::new(profile.id, number, input.contact_type_id))
            .await?;
        tracing::info!(guid = %guid, phone_guid = %phone.guid, "phone added");
        Ok(PhoneView::new(phone, contact_type))
    }

    pub async fn patch_phone(
        &self,
        guid: Uuid,
        phone_guid: Uuid,
        input: PatchPhoneInput,
    ) -> Result<PhoneView, ServiceError> {
        input.validate().map_err(ValidationError::from)?;
        let number = input
            .phone
            .as_deref()
            .map(|phone| required_text("phone", phone))
            .transpose()?;
        let phone = self.require_phone(guid, phone_guid).await?;
        if let Some(id) = input.contact_type_id {
            self.stores.require_contact_type(id).await?;
        }

        let contact_type_id = input.contact_type_id;
        let phone = self
            .stores
            .phones
            .modify(
                phone.id,
                Box::new(move |row: &mut ProfilePhone| {
                    if let Some(number) = number {
                        row.phone = number;
                    }
                    if contact_type_id.is_some() {
                        row.contact_type_id = contact_type_id;
                    }
                    true
                }),
            )
            .await?
            .ok_or(ResourceError::PhoneNotFound { guid: phone_guid })?;

        let contact_type = match phone.contact_type_id {
            Some(id) => self.stores.contact_types.get(id).await?,
            None => None,
        };
        tracing::info!(guid = %guid, phone_guid = %phone_guid, "phone updated");
        Ok(PhoneView::new(phone, contact_type))
    }

    pub async fn delete_phone(&self, guid: Uuid, phone_guid: Uuid) -> Result<(), ServiceError> {
        let phone = self.require_phone(guid, phone_guid).await?;
        self.stores.phones.delete(phone.id).await?;
        tracing::info!(guid = %guid, phone_guid = %phone_guid, "phone deleted");
        Ok(())
    }

    /// The e-mail `email_guid` of profile `guid`
    async fn require_email(
        &self,
        guid: Uuid,
        email_guid: Uuid,
    ) -> Result<ProfileEmail, ServiceError> {
        let profile = self.stores.require_profile(guid).await?;
        self.stores
            .emails
            .find_one(&owned_by(profile.id, email_guid))
            .await?
            .ok_or_else(|| ResourceError::EmailNotFound { guid: email_guid }.into())
    }

    async fn require_phone(
        &self,
        guid: Uuid,
        phone_guid: Uuid,
    ) -> Result<ProfilePhone, ServiceError> {
        let profile = self.stores.require_profile(guid).await?;
        self.stores
            .phones
            .find_one(&owned_by(profile.id, phone_guid))
            .await?
            .ok_or_else(|| ResourceError::PhoneNotFound { guid: phone_guid }.into())
    }
}

fn owned_by(profile_id: i64, guid: Uuid) -> Predicate {
    Predicate::and(vec![
        Predicate::eq(fields::GUID, guid.to_string()),
        Predicate::eq(fields::PROFILE_ID, profile_id),
    ])
}
