pub mod admin;
pub mod members;

use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};

use crate::auth::CurrentSession;
use crate::error::AppResult;
use crate::views::{render, AboutTemplate, IndexTemplate, NotFoundTemplate, Page};

/// GET / - Landing page showing login state
pub async fn index(CurrentSession(session): CurrentSession, uri: Uri) -> AppResult<Html<String>> {
  render(&IndexTemplate {
    page: Page::new(uri.path()),
    logged_in: session.is_valid(),
    name: session.name().unwrap_or_default().to_string(),
  })
}

/// GET /about
pub async fn about(uri: Uri) -> AppResult<Html<String>> {
  render(&AboutTemplate {
    page: Page::new(uri.path()),
  })
}

/// Anything no route or static file answered
pub async fn not_found(uri: Uri) -> AppResult<Response> {
  tracing::debug!("No route for {}", uri.path());
  let body = render(&NotFoundTemplate {
    page: Page::new(uri.path()),
  })?;
  Ok((StatusCode::NOT_FOUND, body).into_response())
}

pub use admin::{admin_page, demote, promote};
pub use members::members;
