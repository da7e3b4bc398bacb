//! Caller identity extractors.
//!
//! Identity arrives as an opaque user id in the `x-user-id` header, set by
//! the authenticating proxy in front of this service. The server trusts the
//! header; it never verifies credentials itself.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use stockvision_core::UserId;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires an authenticated caller.
///
/// Rejects the request with `401 Unauthorized` when the identity header is
/// missing or empty.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {user}!")
/// }
/// ```
pub struct CurrentUser(pub UserId);

/// Error returned when a caller identity is required but absent.
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Missing caller identity").into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_user_id(parts).map(Self).ok_or(IdentityRejection)
    }
}

/// Extractor that optionally gets the caller identity.
///
/// Unlike [`CurrentUser`], this does not reject the request when the header
/// is absent. Point-of-sale checkout uses it to fall back to the anonymous
/// walk-in owner.
pub struct OptionalUser(pub Option<UserId>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(header_user_id(parts)))
    }
}

fn header_user_id(parts: &Parts) -> Option<UserId> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(UserId::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/orders");
        if let Some(value) = value {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (parts, ()) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[test]
    fn extracts_trimmed_user_id() {
        let parts = parts_with_header(Some("  user_1  "));
        let id = header_user_id(&parts).expect("id");
        assert_eq!(id.as_str(), "user_1");
    }

    #[test]
    fn missing_and_blank_headers_yield_none() {
        assert!(header_user_id(&parts_with_header(None)).is_none());
        assert!(header_user_id(&parts_with_header(Some("   "))).is_none());
    }
}
