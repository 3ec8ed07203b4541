use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::ContestantId;

use crate::error::AppError;
use crate::quiz::QuizError;

/// Cookie carrying the contestant id between requests.
pub const CONTESTANT_COOKIE: &str = "contestant-id";

/// Build the cookie set after a successful registration.
pub fn contestant_cookie(id: &str) -> Cookie<'static> {
    Cookie::build((CONTESTANT_COOKIE, id.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Contestant id from the `contestant-id` cookie, if the client sent one.
///
/// Request bodies may also carry the id; use [`CookieContestant::resolve`]
/// to prefer the body and fall back to the cookie.
pub struct CookieContestant(pub Option<String>);

impl CookieContestant {
    pub fn resolve(self, from_body: Option<String>) -> Result<ContestantId, AppError> {
        let raw = from_body
            .filter(|id| !id.trim().is_empty())
            .or(self.0)
            .ok_or_else(|| AppError::Validation("contestant_id is required".into()))?;
        ContestantId::parse(raw.trim()).map_err(|e| QuizError::from(e).into())
    }
}

impl<S> FromRequestParts<S> for CookieContestant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        Ok(CookieContestant(
            jar.get(CONTESTANT_COOKIE).map(|c| c.value().to_owned()),
        ))
    }
}
