//! Profile operations: paginated listing, CRUD and course/interest links

use super::stores::{Stores, required_text};
use crate::core::entity::Entity;
use crate::core::error::{ResourceError, ServiceError, StorageError, ValidationError};
use crate::core::predicate::Predicate;
use crate::core::query::LimitPolicy;
use crate::core::service::DataService;
use crate::entities::profile::fields;
use crate::entities::{
    ContactType, Course, CreateProfileInput, Interest, PatchProfileInput, PhoneView, Profile,
    ProfileEmail, ProfileView, contact,
};
use crate::pagination::{CursorCodec, FilterParams, PROFILES, Page, Paginator};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct ProfileService {
    stores: Stores,
    codec: Arc<CursorCodec>,
    limits: LimitPolicy,
}

impl ProfileService {
    pub fn new(stores: Stores, codec: Arc<CursorCodec>) -> Self {
        Self {
            stores,
            codec,
            limits: LimitPolicy::default(),
        }
    }

    pub fn with_limits(mut self, limits: LimitPolicy) -> Self {
        self.limits = limits;
        self
    }

    /// One page of profiles ordered by display name
    pub async fn list_profiles(
        &self,
        filters: &FilterParams,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Page<ProfileView>, ServiceError> {
        let page =
            Paginator::<Profile, _>::new(&PROFILES, &self.codec, self.stores.profiles.as_ref())
                .with_limits(self.limits)
                .paginate(filters, cursor, limit)
                .await?;

        let Page {
            items,
            previous_cursor,
            next_cursor,
            count,
            previous_url,
            next_url,
        } = page;
        let items = self.expand(items).await?;

        Ok(Page {
            items,
            previous_cursor,
            next_cursor,
            count,
            previous_url,
            next_url,
        })
    }

    pub async fn get_profile_by_guid(&self, guid: Uuid) -> Result<ProfileView, ServiceError> {
        let profile = self.stores.require_profile(guid).await?;
        self.expand_one(profile).await
    }

    pub async fn get_profile_by_user_guid(
        &self,
        user_guid: Uuid,
    ) -> Result<ProfileView, ServiceError> {
        let profile = self
            .stores
            .profiles
            .find_one(&Predicate::eq(fields::USER_GUID, user_guid.to_string()))
            .await?
            .ok_or(ResourceError::UserProfileNotFound { user_guid })?;
        self.expand_one(profile).await
    }

    /// Create the profile of a user; a user has at most one
    pub async fn create_profile(
        &self,
        input: CreateProfileInput,
    ) -> Result<ProfileView, ServiceError> {
        input.validate().map_err(ValidationError::from)?;
        let display_name = required_text(fields::DISPLAY_NAME, &input.display_name)?;

        let owner = Predicate::eq(fields::USER_GUID, input.user_guid.to_string());
        let profile = self
            .stores
            .profiles
            .create_if_absent(Profile::new(input.user_guid, display_name, input.bio), &owner)
            .await?
            .ok_or(ResourceError::ProfileConflict {
                user_guid: input.user_guid,
            })?;

        tracing::info!(guid = %profile.guid, user_guid = %profile.user_guid, "profile created");
        self.expand_one(profile).await
    }

    /// Apply the fields present in `input`
    pub async fn patch_profile(
        &self,
        guid: Uuid,
        input: PatchProfileInput,
    ) -> Result<ProfileView, ServiceError> {
        input.validate().map_err(ValidationError::from)?;
        let display_name = input
            .display_name
            .as_deref()
            .map(|name| required_text(fields::DISPLAY_NAME, name))
            .transpose()?;

        let profile = self
            .edit_profile(guid, move |profile| {
                if let Some(display_name) = display_name {
                    profile.set_display_name(display_name);
                }
                if let Some(bio) = input.bio {
                    profile.bio = Some(bio);
                }
                Ok(())
            })
            .await?;

        tracing::info!(guid = %profile.guid, "profile updated");
        self.expand_one(profile).await
    }

    /// Delete a profile together with its e-mails and phones
    pub async fn delete_profile(&self, guid: Uuid) -> Result<(), ServiceError> {
        let profile = self.stores.require_profile(guid).await?;
        self.stores.profiles.delete(profile.unique_id()).await?;

        let owned = Predicate::eq(contact::fields::PROFILE_ID, profile.id);
        for email in self.stores.emails.find(&owned).await? {
            self.stores.emails.delete(email.id).await?;
        }
        for phone in self.stores.phones.find(&owned).await? {
            self.stores.phones.delete(phone.id).await?;
        }

        tracing::info!(guid = %guid, "profile deleted");
        Ok(())
    }

    pub async fn link_course(&self, guid: Uuid, course_id: i64) -> Result<(), ServiceError> {
        self.stores.require_course(course_id).await?;
        self.edit_profile(guid, |profile| {
            if profile.course_ids.contains(&course_id) {
                return Err(ResourceError::CourseLinkConflict { guid, course_id });
            }
            profile.course_ids.push(course_id);
            Ok(())
        })
        .await?;

        tracing::debug!(guid = %guid, course_id, "course linked");
        Ok(())
    }

    pub async fn unlink_course(&self, guid: Uuid, course_id: i64) -> Result<(), ServiceError> {
        self.stores.require_course(course_id).await?;
        self.edit_profile(guid, |profile| {
            let Some(position) = profile.course_ids.iter().position(|id| *id == course_id) else {
                return Err(ResourceError::CourseLinkNotFound { guid, course_id });
            };
            profile.course_ids.remove(position);
            Ok(())
        })
        .await?;

        tracing::debug!(guid = %guid, course_id, "course unlinked");
        Ok(())
    }

    pub async fn link_interest(&self, guid: Uuid, interest_id: i64) -> Result<(), ServiceError> {
        self.stores.require_interest(interest_id).await?;
        self.edit_profile(guid, |profile| {
            if profile.interest_ids.contains(&interest_id) {
                return Err(ResourceError::InterestLinkConflict { guid, interest_id });
            }
            profile.interest_ids.push(interest_id);
            Ok(())
        })
        .await?;

        tracing::debug!(guid = %guid, interest_id, "interest linked");
        Ok(())
    }

    pub async fn unlink_interest(&self, guid: Uuid, interest_id: i64) -> Result<(), ServiceError> {
        self.stores.require_interest(interest_id).await?;
        self.edit_profile(guid, |profile| {
            let Some(position) = profile
                .interest_ids
                .iter()
                .position(|id| *id == interest_id)
            else {
                return Err(ResourceError::InterestLinkNotFound { guid, interest_id });
            };
            profile.interest_ids.remove(position);
            Ok(())
        })
        .await?;

        tracing::debug!(guid = %guid, interest_id, "interest unlinked");
        Ok(())
    }

    /// Run `edit` against the stored profile in a single store write
    ///
    /// A rejected edit leaves the row untouched; an accepted one also bumps
    /// `updated_at`.
    async fn edit_profile<F>(&self, guid: Uuid, edit: F) -> Result<Profile, ServiceError>
    where
        F: FnOnce(&mut Profile) -> Result<(), ResourceError> + Send,
    {
        let profile = self.stores.require_profile(guid).await?;

        let mut outcome = Ok(());
        let stored = self
            .stores
            .profiles
            .modify(
                profile.id,
                Box::new(|row: &mut Profile| {
                    outcome = edit(row);
                    if outcome.is_ok() {
                        row.touch();
                    }
                    outcome.is_ok()
                }),
            )
            .await?;
        outcome?;

        stored.ok_or_else(|| ResourceError::ProfileNotFound { guid }.into())
    }

    async fn expand_one(&self, profile: Profile) -> Result<ProfileView, ServiceError> {
        let mut views = self.expand(vec![profile]).await?;
        views.pop().ok_or_else(|| {
            StorageError::Backend {
                message: "profile vanished while expanding".to_string(),
            }
            .into()
        })
    }

    /// Replace related ids by the rows they reference
    ///
    /// Ids whose row no longer exists are dropped from the view.
    async fn expand(&self, profiles: Vec<Profile>) -> Result<Vec<ProfileView>, StorageError> {
        if profiles.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = profiles
            .iter()
            .flat_map(|profile| profile.course_ids.iter().copied())
            .collect();
        let interest_ids: Vec<i64> = profiles
            .iter()
            .flat_map(|profile| profile.interest_ids.iter().copied())
            .collect();
        let profile_ids: Vec<i64> = profiles.iter().map(|profile| profile.id).collect();

        let courses: BTreeMap<i64, Course> = lookup(&*self.stores.courses, course_ids).await?;
        let interests: BTreeMap<i64, Interest> =
            lookup(&*self.stores.interests, interest_ids).await?;

        let owned = Predicate::in_set(contact::fields::PROFILE_ID, profile_ids);
        let mut emails: BTreeMap<i64, Vec<ProfileEmail>> = BTreeMap::new();
        for email in self.stores.emails.find(&owned).await? {
            emails.entry(email.profile_id).or_default().push(email);
        }
        let phone_rows = self.stores.phones.find(&owned).await?;
        let type_ids: Vec<i64> = phone_rows
            .iter()
            .filter_map(|phone| phone.contact_type_id)
            .collect();
        let contact_types: BTreeMap<i64, ContactType> =
            lookup(&*self.stores.contact_types, type_ids).await?;
        let mut phones: BTreeMap<i64, Vec<PhoneView>> = BTreeMap::new();
        for phone in phone_rows {
            let kind = phone
                .contact_type_id
                .and_then(|id| contact_types.get(&id).cloned());
            phones
                .entry(phone.profile_id)
                .or_default()
                .push(PhoneView::new(phone, kind));
        }

        Ok(profiles
            .into_iter()
            .map(|profile| {
                let linked_courses = profile
                    .course_ids
                    .iter()
                    .filter_map(|id| courses.get(id).cloned())
                    .collect();
                let linked_interests = profile
                    .interest_ids
                    .iter()
                    .filter_map(|id| interests.get(id).cloned())
                    .collect();
                let profile_emails = emails.remove(&profile.id).unwrap_or_default();
                let profile_phones = phones.remove(&profile.id).unwrap_or_default();
                ProfileView::new(
                    profile,
                    linked_courses,
                    linked_interests,
                    profile_emails,
                    profile_phones,
                )
            })
            .collect())
    }
}

/// Fetch the rows with the given ids in one query, keyed by id
async fn lookup<T: Entity>(
    store: &dyn DataService<T>,
    ids: Vec<i64>,
) -> Result<BTreeMap<i64, T>, StorageError> {
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(store
        .find(&Predicate::in_set(T::unique_id_field(), ids))
        .await?
        .into_iter()
        .map(|row| (row.unique_id(), row))
        .collect())
}
