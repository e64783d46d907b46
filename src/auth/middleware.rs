//! Session loading, the session extractor and the two route guards.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use std::convert::Infallible;

use crate::db::try_lock;
use crate::error::AppResult;
use crate::session::{self, Session, SESSION_COOKIE_NAME};
use crate::state::AppState;
use crate::views::{render, ErrorTemplate, Page};

/// Attach a [`Session`] to every request.
///
/// A cookie with a bad signature, or whose session is unknown or expired,
/// yields an anonymous session. Nothing is written for anonymous visitors.
pub async fn load_session(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let session = match jar.get(SESSION_COOKIE_NAME) {
        Some(cookie) => resolve_session(&state, cookie.value())?,
        None => Session::anonymous(),
    };
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

fn resolve_session(state: &AppState, session_id: &str) -> AppResult<Session> {
    let conn = try_lock(&state.db)?;
    session::maybe_cleanup_expired(&conn);

    let session = match session::load_session(&conn, state.store_secret(), session_id)? {
        Some(data) => Session {
            id: Some(session_id.to_string()),
            data,
        },
        None => {
            tracing::debug!("Session cookie did not match a live session");
            Session::anonymous()
        }
    };
    Ok(session)
}

/// The request's session, as attached by [`load_session`].
/// Falls back to an anonymous session when the middleware is absent.
pub struct CurrentSession(pub Session);

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentSession(
            parts.extensions.get::<Session>().cloned().unwrap_or_default(),
        ))
    }
}

/// Redirect to /login unless the session is authenticated
pub async fn require_session(
    CurrentSession(session): CurrentSession,
    request: Request,
    next: Next,
) -> Response {
    if session.is_valid() {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

/// Respond 403 unless the session belongs to an admin
pub async fn require_admin(
    CurrentSession(session): CurrentSession,
    uri: Uri,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    if session.is_admin() {
        return Ok(next.run(request).await);
    }

    tracing::warn!(
        "Non-admin {:?} denied access to {}",
        session.name().unwrap_or("<anonymous>"),
        uri.path()
    );
    let body = render(&ErrorTemplate {
        page: Page::new(uri.path()),
        error: "Not Authorized".to_string(),
    })?;
    Ok((StatusCode::FORBIDDEN, body).into_response())
}
