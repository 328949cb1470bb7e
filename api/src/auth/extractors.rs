use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::{CookieJar, TypedHeader};
use headers::{Authorization, authorization::Bearer};

use crate::auth::{AuthUser, SESSION_COOKIE, decode_jwt};

/// Implements extraction of `AuthUser` from request headers.
///
/// The token is taken from a `Authorization: Bearer` header, falling back to
/// the session cookie set at login. Only the signature and expiry are checked
/// here; the login guard additionally confirms the user still exists.
///
/// # Errors
/// - Returns `401 Unauthorized` if no token is present or it is invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_owned());

        let token = bearer
            .or_else(|| {
                CookieJar::from_headers(&parts.headers)
                    .get(SESSION_COOKIE)
                    .map(|cookie| cookie.value().to_owned())
            })
            .ok_or((StatusCode::UNAUTHORIZED, "Authentication required"))?;

        decode_jwt(&token)
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}
