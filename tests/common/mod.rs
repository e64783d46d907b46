//! Shared setup for integration tests.
//!
//! Each [`TestApp`] runs the full router over its own SQLite file in a
//! temporary directory, with a client that keeps cookies between requests.

#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use std::path::PathBuf;
use tempfile::TempDir;

use veggie_members::auth::password::hash_password;
use veggie_members::config::Config;
use veggie_members::db::{self, try_lock};
use veggie_members::domain::{Role, UserSummary};
use veggie_members::state::AppState;

pub struct TestApp {
    /// Kept alive for the database file
    pub temp: TempDir,
    pub state: AppState,
    pub server: TestServer,
}

impl TestApp {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0,
            database_path: temp.path().join("app.db"),
            public_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
            session_store_secret: "test-store-secret".into(),
            cookie_secret: "test-cookie-secret".into(),
            bootstrap_admin: None,
        };

        let pool = db::init_db(&config.database_path).expect("init db");
        let state = AppState::new(pool, config);
        let server = TestServer::builder()
            .save_cookies()
            .build(veggie_members::app(state.clone()))
            .expect("test server");

        Self { temp, state, server }
    }

    /// A second client over the same app that never stores cookies
    pub fn cookieless_client(&self) -> TestServer {
        TestServer::builder()
            .build(veggie_members::app(self.state.clone()))
            .expect("test server")
    }

    /// Insert a user straight into the store
    pub fn create_user(&self, name: &str, email: &str, password: &str, role: Role) {
        let hash = hash_password(password).expect("hash");
        let conn = try_lock(&self.state.db).unwrap();
        db::insert_user(&conn, name, email, &hash, role).unwrap();
    }

    pub fn users(&self) -> Vec<UserSummary> {
        let conn = try_lock(&self.state.db).unwrap();
        db::list_users(&conn).unwrap()
    }

    pub fn user_count(&self) -> i64 {
        let conn = try_lock(&self.state.db).unwrap();
        db::count_users(&conn).unwrap()
    }

    pub fn session_count(&self) -> i64 {
        let conn = try_lock(&self.state.db).unwrap();
        conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap()
    }

    pub fn stored_password(&self, email: &str) -> String {
        let conn = try_lock(&self.state.db).unwrap();
        db::find_users_by_email(&conn, email).unwrap()[0].password.clone()
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.server
            .post("/signupSubmit")
            .form(&[("name", name), ("email", email), ("password", password)])
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.server
            .post("/loginSubmit")
            .form(&[("email", email), ("password", password)])
            .await
    }
}

/// The `name=value` pair of the response's session cookie
pub fn session_cookie_pair(response: &TestResponse) -> String {
    let set_cookie = response.header("set-cookie");
    let set_cookie = set_cookie.to_str().expect("ascii set-cookie");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .trim()
        .to_string()
}

pub fn assert_redirect(response: &TestResponse, location: &str) {
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), location);
}
