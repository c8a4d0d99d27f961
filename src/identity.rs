//! Session identity: storing the signed-in user and extracting it in handlers.
//!
//! The identity id kept by `actix-identity` is the JSON form of
//! [`AuthenticatedUser`]. Handlers that need a signed-in user take
//! `AuthenticatedUser` and anonymous visitors are redirected to the login
//! page; handlers that merely care take `Option<AuthenticatedUser>`.

use std::fmt::{Display, Formatter};
use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};

use crate::domain::auth::AuthenticatedUser;

pub const LOGIN_URL: &str = "/auth/login/";

/// The user currently signed in, if any.
pub fn current_user(req: &HttpRequest) -> Option<AuthenticatedUser> {
    let identity = req.get_identity().ok()?;
    let id = identity.id().ok()?;
    match serde_json::from_str(&id) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Discarding unreadable session identity: {e}");
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("failed to serialize identity: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to attach identity: {0}")]
    Login(#[from] actix_identity::error::LoginError),
}

/// Attach `user` to the session, replacing any previous identity.
pub fn remember(req: &HttpRequest, user: &AuthenticatedUser) -> Result<(), IdentityError> {
    let id = serde_json::to_string(user)?;
    Identity::login(&req.extensions(), id)?;
    Ok(())
}

/// Accept only local absolute paths as post-login destinations.
pub fn safe_next(next: &str) -> Option<&str> {
    let next = next.trim();
    let local = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    local.then_some(next)
}

/// Login page URL that returns to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!("{LOGIN_URL}?next={}", urlencoding::encode(next))
}

/// Rejection produced when a handler requires a signed-in user.
#[derive(Debug)]
pub struct LoginRequired {
    next: String,
}

impl Display for LoginRequired {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "login required to access {}", self.next)
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, login_url(&self.next)))
            .finish()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_user(req).ok_or_else(|| LoginRequired {
            next: req.uri().path().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(
            login_url("/posts/create"),
            "/auth/login/?next=%2Fposts%2Fcreate"
        );
        assert_eq!(
            login_url("/profile/anna k/"),
            "/auth/login/?next=%2Fprofile%2Fanna%20k%2F"
        );
        assert_eq!(
            login_url("/search?q=a&page=2#top"),
            "/auth/login/?next=%2Fsearch%3Fq%3Da%26page%3D2%23top"
        );
    }

    #[test]
    fn only_local_paths_are_safe() {
        assert_eq!(safe_next("/posts/1/"), Some("/posts/1/"));
        assert_eq!(safe_next("//evil.example"), None);
        assert_eq!(safe_next("https://evil.example"), None);
        assert_eq!(safe_next("/\\evil.example"), None);
        assert_eq!(safe_next(""), None);
    }

    #[test]
    fn login_required_redirects() {
        let err = LoginRequired {
            next: "/posts/create".into(),
        };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login/?next=%2Fposts%2Fcreate"
        );
    }
}
