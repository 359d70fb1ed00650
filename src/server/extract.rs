//! Request extractors whose rejections render as [`ServiceError`]
//!
//! A body or query string that cannot be parsed answers with the same
//! `REQUEST_VALIDATION_ERROR` envelope as any other invalid input.

use crate::core::error::{ServiceError, ValidationError};
use crate::core::query::ListQuery;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// JSON request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_profile(
///     JsonBody(input): JsonBody<CreateProfileInput>,
/// ) -> Result<Json<ProfileView>, ServiceError> {
///     // input is a well-formed CreateProfileInput
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ValidationError::Body(rejection.body_text()).into()),
        }
    }
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.uri.query().unwrap_or_default();
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
            .map_err(|e| ValidationError::Query(e.to_string()))?;
        Ok(ListQuery::from_pairs(pairs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CreateProfileInput;
    use axum::body::Body;
    use axum::http;
    use axum::http::header::CONTENT_TYPE;

    fn json_request(body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri("/profiles")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_field_is_a_validation_error() {
        let request = json_request(r#"{"display_name":"x"}"#);
        let result = JsonBody::<CreateProfileInput>::from_request(request, &()).await;
        let Err(err) = result else {
            panic!("body without user_guid must be rejected");
        };
        assert_eq!(err.error_code(), "REQUEST_VALIDATION_ERROR");
        assert!(err.to_string().contains("user_guid"), "{}", err);
    }

    #[tokio::test]
    async fn test_list_query_from_uri() {
        let request = http::Request::builder()
            .uri("/profiles?limit=5&courses_in=1&courses_in=2")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let query = ListQuery::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(query.limit, Some(5));
        assert!(query.cursor.is_none());
    }
}
