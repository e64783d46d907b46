use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use rand::seq::IndexedRandom;

use crate::auth::CurrentSession;
use crate::error::AppResult;
use crate::views::{render, MembersTemplate, Page};

/// Pictures under the public directory, one shown per visit
const PICTURES: [&str; 3] = ["/broccoli.svg", "/carrot.svg", "/pepper.svg"];

/// GET /members - Members-only page (behind `require_session`)
pub async fn members(CurrentSession(session): CurrentSession, uri: Uri) -> AppResult<Response> {
  if !session.is_valid() {
    return Ok(Redirect::to("/").into_response());
  }

  let picture = PICTURES.choose(&mut rand::rng()).copied().unwrap_or(PICTURES[0]);

  let body = render(&MembersTemplate {
    page: Page::new(uri.path()),
    name: session.data.name,
    picture,
  })?;
  Ok(body.into_response())
}
