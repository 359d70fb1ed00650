//! Route table

use crate::server::handlers::{
    add_email, add_phone, create_profile, delete_email, delete_phone, delete_profile,
    get_profile, get_user_profile, link_course, link_interest, list_contact_types, list_courses,
    list_interests, list_profiles, patch_email, patch_phone, patch_profile, ping, unlink_course,
    unlink_interest,
};
use crate::server::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

/// Build every route of the service
///
/// - GET /ping
/// - GET, POST /profiles
/// - GET, PATCH, DELETE /profiles/{guid}
/// - POST, DELETE /profiles/{guid}/courses/{course_id}
/// - POST, DELETE /profiles/{guid}/interests/{interest_id}
/// - POST /profiles/{guid}/emails
/// - PATCH, DELETE /profiles/{guid}/emails/{email_guid}
/// - POST /profiles/{guid}/phones
/// - PATCH, DELETE /profiles/{guid}/phones/{phone_guid}
/// - GET /users/{user_guid}/profile
/// - GET /courses
/// - GET /interests
/// - GET /contact-types
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/profiles", get(list_profiles).post(create_profile))
        .route(
            "/profiles/{guid}",
            get(get_profile).patch(patch_profile).delete(delete_profile),
        )
        .route(
            "/profiles/{guid}/courses/{course_id}",
            post(link_course).delete(unlink_course),
        )
        .route(
            "/profiles/{guid}/interests/{interest_id}",
            post(link_interest).delete(unlink_interest),
        )
        .route("/profiles/{guid}/emails", post(add_email))
        .route(
            "/profiles/{guid}/emails/{email_guid}",
            patch(patch_email).delete(delete_email),
        )
        .route("/profiles/{guid}/phones", post(add_phone))
        .route(
            "/profiles/{guid}/phones/{phone_guid}",
            patch(patch_phone).delete(delete_phone),
        )
        .route("/users/{user_guid}/profile", get(get_user_profile))
        .route("/courses", get(list_courses))
        .route("/interests", get(list_interests))
        .route("/contact-types", get(list_contact_types))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
