use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the authenticated user id, set by the auth proxy in
/// front of this service.
pub const USER_HEADER: &str = "x-forwarded-user";

/// Identity resolved from the session collaborator.
///
/// Session mechanics live in the fronting proxy; this service only reads
/// the forwarded identity. `None` means no session, and the services
/// reject it as unauthenticated on the first gate.
pub struct CurrentUser(pub Option<String>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(Self(user))
    }
}
