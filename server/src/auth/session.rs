//! Admin session carried in a signed cookie.
//!
//! The cookie holds a single flag; the signature (keyed from `SECRET_KEY`)
//! is what makes it trustworthy. Handlers that need an admin take an
//! [`AdminSession`] argument, which redirects to the login page when the
//! flag is absent or its signature does not verify.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};

/// Cookie name for the admin flag
pub const ADMIN_COOKIE: &str = "guichet_admin";

const ADMIN_FLAG: &str = "1";

pub const LOGIN_PATH: &str = "/admin/connexion_admin";
pub const DASHBOARD_PATH: &str = "/admin/dashboard_admin";

/// Proof that the current request comes from an authenticated admin.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl AdminSession {
    pub fn is_set(jar: &SignedCookieJar) -> bool {
        jar.get(ADMIN_COOKIE)
            .is_some_and(|cookie| cookie.value() == ADMIN_FLAG)
    }

    /// Mark the client as authenticated.
    pub fn grant(jar: SignedCookieJar, secure: bool) -> SignedCookieJar {
        let cookie = Cookie::build((ADMIN_COOKIE, ADMIN_FLAG))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure);
        jar.add(cookie)
    }

    pub fn revoke(jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build(ADMIN_COOKIE).path("/"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match SignedCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        if Self::is_set(&jar) {
            Ok(AdminSession)
        } else {
            tracing::debug!(path = %parts.uri.path(), "Admin session missing, redirecting to login");
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}
