//! User administration: listing and role changes. Routes sit behind
//! `require_session` and `require_admin`.

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::{Html, Redirect};
use serde::Deserialize;

use crate::auth::CurrentSession;
use crate::db::{self, try_lock};
use crate::domain::Role;
use crate::error::AppResult;
use crate::state::AppState;
use crate::views::{render, AdminTemplate, Page};

#[derive(Deserialize)]
pub struct RoleChange {
  #[serde(default)]
  pub name: String,
}

/// GET /admin - List all users
pub async fn admin_page(State(state): State<AppState>, uri: Uri) -> AppResult<Html<String>> {
  let users = {
    let conn = try_lock(&state.db)?;
    db::list_users(&conn)?
  };

  render(&AdminTemplate {
    page: Page::new(uri.path()),
    users,
  })
}

/// GET /admin/promote?name=X
pub async fn promote(
  State(state): State<AppState>,
  CurrentSession(session): CurrentSession,
  Query(change): Query<RoleChange>,
) -> AppResult<Redirect> {
  change_role(&state, &session.data.name, &change.name, Role::Admin)
}

/// GET /admin/demote?name=X
pub async fn demote(
  State(state): State<AppState>,
  CurrentSession(session): CurrentSession,
  Query(change): Query<RoleChange>,
) -> AppResult<Redirect> {
  change_role(&state, &session.data.name, &change.name, Role::User)
}

fn change_role(state: &AppState, actor: &str, target: &str, role: Role) -> AppResult<Redirect> {
  if target.is_empty() {
    tracing::warn!("Role change to {} without a user name", role);
    return Ok(Redirect::to("/admin"));
  }

  let conn = try_lock(&state.db)?;
  match db::set_role(&conn, target, role)? {
    0 => tracing::warn!("Role change: no user named {}", target),
    _ => tracing::info!("{} set {} to {}", actor, target, role),
  }
  Ok(Redirect::to("/admin"))
}
