pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod session;
pub mod state;
pub mod views;

use axum::handler::HandlerWithoutStateExt;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
///
/// Every request passes through the session loader; `/members` and the
/// `/admin` routes add their guards on top. Paths no route claims are served
/// from the public directory, or answered with the 404 page.
pub fn app(state: AppState) -> Router {
  let members = Router::new()
    .route("/members", get(handlers::members))
    .route_layer(from_fn(auth::require_session));

  // Layers run outside-in: session check first, then the role check
  let admin = Router::new()
    .route("/admin", get(handlers::admin_page))
    .route("/admin/promote", get(handlers::promote))
    .route("/admin/demote", get(handlers::demote))
    .route_layer(from_fn(auth::require_admin))
    .route_layer(from_fn(auth::require_session));

  let assets = ServeDir::new(&state.config.public_dir)
    .call_fallback_on_method_not_allowed(true)
    .not_found_service(handlers::not_found.into_service());

  Router::new()
    .route("/", get(handlers::index))
    .route("/about", get(handlers::about))
    .route("/signup", get(auth::signup_page))
    .route("/signupSubmit", post(auth::signup_submit))
    .route("/login", get(auth::login_page))
    .route("/loginSubmit", post(auth::login_submit))
    .route("/logout", get(auth::logout))
    .merge(members)
    .merge(admin)
    // Wrong method on a known path is treated as an unknown path
    .method_not_allowed_fallback(handlers::not_found)
    .fallback_service(assets)
    .layer(from_fn_with_state(state.clone(), auth::load_session))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
