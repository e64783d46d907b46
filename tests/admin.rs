//! Admin listing and role changes.

mod common;

use axum::http::StatusCode;
use common::{assert_redirect, TestApp};
use veggie_members::domain::Role;

async fn admin_app() -> TestApp {
    let app = TestApp::new();
    app.create_user("root", "root@x.io", "secret", Role::Admin);
    app.create_user("bob", "bob@x.io", "secret", Role::User);
    assert_redirect(&app.login("root@x.io", "secret").await, "/members");
    app
}

#[tokio::test]
async fn test_admin_requires_session() {
    let app = TestApp::new();

    assert_redirect(&app.server.get("/admin").await, "/login");
    assert_redirect(&app.server.get("/admin/promote").add_query_param("name", "bob").await, "/login");
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let app = TestApp::new();
    app.signup("alice", "alice@x.io", "hunter2").await;

    let response = app.server.get("/admin").await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert!(response.text().contains("Not Authorized"));
}

#[tokio::test]
async fn test_non_admin_cannot_promote() {
    let app = TestApp::new();
    app.signup("alice", "alice@x.io", "hunter2").await;

    let response = app
        .server
        .get("/admin/promote")
        .add_query_param("name", "alice")
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(app.users()[0].user_type, Role::User);
}

#[tokio::test]
async fn test_admin_lists_users() {
    let app = admin_app().await;

    let response = app.server.get("/admin").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("root"));
    assert!(body.contains("/admin/promote?name=bob"));
}

#[tokio::test]
async fn test_promote_then_listing_shows_admin() {
    let app = admin_app().await;

    let response = app
        .server
        .get("/admin/promote")
        .add_query_param("name", "bob")
        .await;
    assert_redirect(&response, "/admin");

    let bob = app.users().into_iter().find(|u| u.name == "bob").unwrap();
    assert_eq!(bob.user_type, Role::Admin);

    let listing = app.server.get("/admin").await.text();
    assert!(listing.contains("/admin/demote?name=bob"));
}

#[tokio::test]
async fn test_demote() {
    let app = admin_app().await;
    app.server.get("/admin/promote").add_query_param("name", "bob").await;

    let response = app
        .server
        .get("/admin/demote")
        .add_query_param("name", "bob")
        .await;
    assert_redirect(&response, "/admin");

    let bob = app.users().into_iter().find(|u| u.name == "bob").unwrap();
    assert_eq!(bob.user_type, Role::User);
}

#[tokio::test]
async fn test_role_change_for_unknown_user_is_noop() {
    let app = admin_app().await;

    let response = app
        .server
        .get("/admin/promote")
        .add_query_param("name", "ghost")
        .await;
    assert_redirect(&response, "/admin");

    assert_redirect(&app.server.get("/admin/promote").await, "/admin");

    let roles: Vec<_> = app.users().into_iter().map(|u| (u.name, u.user_type)).collect();
    assert_eq!(
        roles,
        vec![("root".to_string(), Role::Admin), ("bob".to_string(), Role::User)]
    );
}
