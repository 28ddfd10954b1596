//! Login gate for the room routes.
//!
//! A request is authenticated by a live server session or, failing that, by
//! the long-lived `login` cookie. The latter starts a new session whose id is
//! returned in a `Set-Cookie` header.

use crate::{error::AppError, state::AppState};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use log::{debug, warn};

pub const LOGIN_COOKIE: &str = "login";
pub const SESSION_COOKIE: &str = "frf_session";

/// The credential that authenticated a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A login token; a session was created for it
    Cookie(String),
    /// An existing session id
    Session(String),
}

/// Who is making the request, inserted as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub username: String,
    pub session_id: String,
    pub source: CredentialSource,
}

/// RFC 6265 `cookie-octet`
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// The value of cookie `name` from any `Cookie` header; the first
/// occurrence wins and a malformed value counts as absent
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|inner| inner.strip_suffix('"'))
                .unwrap_or(value)
        })
        .filter(|value| !value.is_empty() && value.bytes().all(is_cookie_octet))
}

fn session_cookie(session_id: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Resolves the request's credentials into an [`AuthContext`]
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, AppError> {
    if let Some(session_id) = cookie_value(headers, SESSION_COOKIE) {
        if let Some(username) = state.sessions.username(session_id) {
            return Ok(AuthContext {
                username,
                session_id: session_id.to_string(),
                source: CredentialSource::Session(session_id.to_string()),
            });
        }
        debug!("Ignoring unknown or expired session");
    }

    let Some(token) = cookie_value(headers, LOGIN_COOKIE) else {
        return Err(AppError::Unauthenticated);
    };

    let Some(username) = state.logins.username_for_token(token).await? else {
        warn!("Rejected an unknown login token");
        return Err(AppError::Unauthenticated);
    };

    let session_id = state.sessions.create(&username);
    debug!("Started a session for {username}");

    Ok(AuthContext {
        username,
        session_id,
        source: CredentialSource::Cookie(token.to_string()),
    })
}

/// Middleware rejecting unauthenticated requests before any handler runs
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = authenticate(&state, request.headers()).await?;

    let new_session = match &auth.source {
        CredentialSource::Cookie(_) => Some(session_cookie(&auth.session_id, state.secure_cookies)),
        CredentialSource::Session(_) => None,
    };

    request.extensions_mut().insert(auth);
    let mut response = next.run(request).await;

    if let Some(cookie) = new_session.and_then(|c| HeaderValue::from_str(&c).ok()) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}
