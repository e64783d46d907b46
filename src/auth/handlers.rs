//! Signup, login and logout handlers.

use axum::{
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;

use super::middleware::CurrentSession;
use super::password;
use super::validation::{LoginForm, SignupForm};
use crate::config::SESSION_EXPIRY_HOURS;
use crate::db::{self, try_lock};
use crate::domain::Role;
use crate::error::AppResult;
use crate::session::{self, generate_session_id, Session, SessionData, SESSION_COOKIE_NAME};
use crate::state::AppState;
use crate::views::{
    render, LoginSubmitTemplate, LoginTemplate, Page, SignupSubmitTemplate, SignupTemplate,
};

/// Login failure reasons shown to the visitor
const LOGIN_INVALID_CHARS: &str = "invalid chars";
const LOGIN_NO_USER: &str = "no user";
const LOGIN_BAD_PASSWORD: &str = "bad password";

/// GET /signup - Show signup form
pub async fn signup_page(uri: Uri) -> AppResult<Html<String>> {
    render(&SignupTemplate {
        page: Page::new(uri.path()),
    })
}

/// POST /signupSubmit - Create a user and log them in
pub async fn signup_submit(
    State(state): State<AppState>,
    CurrentSession(previous): CurrentSession,
    jar: SignedCookieJar,
    uri: Uri,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    if let Err(error) = form.check() {
        tracing::debug!("Signup rejected: {}", error.tag());
        let body = render(&SignupSubmitTemplate {
            page: Page::new(uri.path()),
            error_tag: error.tag(),
            message: error.message(),
            name: form.name,
            email: form.email,
        })?;
        return Ok(body.into_response());
    }

    let password_hash = password::hash_password(&form.password)?;

    {
        let conn = try_lock(&state.db)?;
        let user_id = db::insert_user(&conn, &form.name, &form.email, &password_hash, Role::User)?;
        tracing::info!("Inserted user {} ({})", form.name, user_id);
    }

    let data = SessionData::authenticated(form.name, Role::User);
    let jar = establish_session(&state, jar, &previous, &data)?;
    Ok((jar, Redirect::to("/members")).into_response())
}

/// GET /login - Show login form
pub async fn login_page(uri: Uri) -> AppResult<Html<String>> {
    render(&LoginTemplate {
        page: Page::new(uri.path()),
    })
}

/// POST /loginSubmit - Check credentials and log in
pub async fn login_submit(
    State(state): State<AppState>,
    CurrentSession(previous): CurrentSession,
    jar: SignedCookieJar,
    uri: Uri,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let failed = |error: &'static str| -> AppResult<Response> {
        let body = render(&LoginSubmitTemplate {
            page: Page::new(uri.path()),
            error,
        })?;
        Ok(body.into_response())
    };

    if let Err(error) = form.check() {
        tracing::debug!("Login rejected: {}", error.tag());
        return failed(LOGIN_INVALID_CHARS);
    }

    let users = {
        let conn = try_lock(&state.db)?;
        db::find_users_by_email(&conn, &form.email)?
    };

    // Zero or several accounts under one email are both treated as unknown
    let [user] = users.as_slice() else {
        tracing::warn!("Login for {}: {} matching users", form.email, users.len());
        return failed(LOGIN_NO_USER);
    };

    if !password::verify_password(&form.password, &user.password) {
        tracing::warn!("Login for {}: incorrect password", form.email);
        return failed(LOGIN_BAD_PASSWORD);
    }

    tracing::info!("User {} logged in", user.name);
    let data = SessionData::authenticated(user.name.clone(), user.user_type);
    let jar = establish_session(&state, jar, &previous, &data)?;
    Ok((jar, Redirect::to("/members")).into_response())
}

/// GET /logout - Destroy the session
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    if let Some(session_id) = &session.id {
        let conn = try_lock(&state.db)?;
        session::delete_session(&conn, state.store_secret(), session_id)?;
        tracing::info!("User {} logged out", session.data.name);
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    Ok((jar, Redirect::to("/")).into_response())
}

/// Store `data` under a fresh session id and set the signed cookie.
/// Any session the request already had is discarded.
fn establish_session(
    state: &AppState,
    jar: SignedCookieJar,
    previous: &Session,
    data: &SessionData,
) -> AppResult<SignedCookieJar> {
    let session_id = generate_session_id();
    {
        let conn = try_lock(&state.db)?;
        if let Some(old_id) = &previous.id {
            session::delete_session(&conn, state.store_secret(), old_id)?;
        }
        session::save_session(&conn, state.store_secret(), &session_id, data)?;
    }

    let cookie = Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::hours(SESSION_EXPIRY_HOURS))
        .build();

    Ok(jar.add(cookie))
}
