//! HTTP handlers
//!
//! Handlers only translate between HTTP and the services; every error
//! renders through [`ServiceError`].

use crate::core::error::{ServiceError, ValidationError};
use crate::core::query::ListQuery;
use crate::entities::{
    ContactType, Course, CreateProfileInput, EmailInput, Interest, PatchEmailInput,
    PatchPhoneInput, PatchProfileInput, PhoneInput, PhoneView, ProfileEmail, ProfileView,
};
use crate::pagination::Page;
use crate::server::extract::JsonBody;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// `GET /ping`
pub async fn ping() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// `GET /profiles?limit=&cursor=&courses_in=&interests_in=&display_name_ilike=`
pub async fn list_profiles(
    State(state): State<AppState>,
    query: ListQuery,
) -> Result<Json<Page<ProfileView>>, ServiceError> {
    let page = state
        .profiles
        .list_profiles(&query.filters, query.cursor.as_deref(), query.limit)
        .await?
        .with_links(
            &state.url("/profiles"),
            &query.passthrough,
            query.cursor.is_some(),
        )?;

    Ok(Json(page))
}

/// `POST /profiles`
pub async fn create_profile(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateProfileInput>,
) -> Result<(StatusCode, Json<ProfileView>), ServiceError> {
    let profile = state.profiles.create_profile(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /profiles/{guid}`
pub async fn get_profile(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<ProfileView>, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    Ok(Json(state.profiles.get_profile_by_guid(guid).await?))
}

/// `GET /users/{user_guid}/profile`
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(user_guid): Path<String>,
) -> Result<Json<ProfileView>, ServiceError> {
    let user_guid = parse_guid("user_guid", &user_guid)?;
    Ok(Json(state.profiles.get_profile_by_user_guid(user_guid).await?))
}

/// `PATCH /profiles/{guid}`
pub async fn patch_profile(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    JsonBody(input): JsonBody<PatchProfileInput>,
) -> Result<Json<ProfileView>, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    Ok(Json(state.profiles.patch_profile(guid, input).await?))
}

/// `DELETE /profiles/{guid}`
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    state.profiles.delete_profile(guid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /profiles/{guid}/courses/{course_id}`
pub async fn link_course(
    State(state): State<AppState>,
    Path((guid, course_id)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let course_id = parse_id("course_id", &course_id)?;
    state.profiles.link_course(guid, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /profiles/{guid}/courses/{course_id}`
pub async fn unlink_course(
    State(state): State<AppState>,
    Path((guid, course_id)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let course_id = parse_id("course_id", &course_id)?;
    state.profiles.unlink_course(guid, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /profiles/{guid}/interests/{interest_id}`
pub async fn link_interest(
    State(state): State<AppState>,
    Path((guid, interest_id)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let interest_id = parse_id("interest_id", &interest_id)?;
    state.profiles.link_interest(guid, interest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /profiles/{guid}/interests/{interest_id}`
pub async fn unlink_interest(
    State(state): State<AppState>,
    Path((guid, interest_id)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let interest_id = parse_id("interest_id", &interest_id)?;
    state.profiles.unlink_interest(guid, interest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /profiles/{guid}/emails`
pub async fn add_email(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    JsonBody(input): JsonBody<EmailInput>,
) -> Result<(StatusCode, Json<ProfileEmail>), ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let email = state.contacts.add_email(guid, input).await?;
    Ok((StatusCode::CREATED, Json(email)))
}

/// `PATCH /profiles/{guid}/emails/{email_guid}`
pub async fn patch_email(
    State(state): State<AppState>,
    Path((guid, email_guid)): Path<(String, String)>,
    JsonBody(input): JsonBody<PatchEmailInput>,
) -> Result<Json<ProfileEmail>, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let email_guid = parse_guid("email_guid", &email_guid)?;
    Ok(Json(state.contacts.patch_email(guid, email_guid, input).await?))
}

/// `DELETE /profiles/{guid}/emails/{email_guid}`
pub async fn delete_email(
    State(state): State<AppState>,
    Path((guid, email_guid)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let email_guid = parse_guid("email_guid", &email_guid)?;
    state.contacts.delete_email(guid, email_guid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /profiles/{guid}/phones`
pub async fn add_phone(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    JsonBody(input): JsonBody<PhoneInput>,
) -> Result<(StatusCode, Json<PhoneView>), ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let phone = state.contacts.add_phone(guid, input).await?;
    Ok((StatusCode::CREATED, Json(phone)))
}

/// `PATCH /profiles/{guid}/phones/{phone_guid}`
pub async fn patch_phone(
    State(state): State<AppState>,
    Path((guid, phone_guid)): Path<(String, String)>,
    JsonBody(input): JsonBody<PatchPhoneInput>,
) -> Result<Json<PhoneView>, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let phone_guid = parse_guid("phone_guid", &phone_guid)?;
    Ok(Json(state.contacts.patch_phone(guid, phone_guid, input).await?))
}

/// `DELETE /profiles/{guid}/phones/{phone_guid}`
pub async fn delete_phone(
    State(state): State<AppState>,
    Path((guid, phone_guid)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    let guid = parse_guid("guid", &guid)?;
    let phone_guid = parse_guid("phone_guid", &phone_guid)?;
    state.contacts.delete_phone(guid, phone_guid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /courses`
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, ServiceError> {
    Ok(Json(state.catalog.list_courses().await?))
}

/// `GET /interests`
pub async fn list_interests(
    State(state): State<AppState>,
) -> Result<Json<Vec<Interest>>, ServiceError> {
    Ok(Json(state.catalog.list_interests().await?))
}

/// `GET /contact-types`
pub async fn list_contact_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactType>>, ServiceError> {
    Ok(Json(state.catalog.list_contact_types().await?))
}

fn parse_guid(field: &str, raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::Field {
        field: field.to_string(),
        message: format!("'{}' is not a UUID", raw),
    })
}

fn parse_id(field: &str, raw: &str) -> Result<i64, ValidationError> {
    raw.parse().map_err(|_| ValidationError::Field {
        field: field.to_string(),
        message: format!("'{}' is not an integer id", raw),
    })
}
