//! Request-path errors.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::db::DbLockError;
use crate::views::{ErrorTemplate, Page};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Lock(#[from] DbLockError),

    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(e)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);

        let template = ErrorTemplate {
            page: Page::new("/"),
            error: "Something went wrong".to_string(),
        };
        match template.render() {
            Ok(body) => (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response(),
        }
    }
}
