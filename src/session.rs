//! Session store backed by the `sessions` table.
//!
//! The cookie carries a random session id; rows are keyed by a digest of that
//! id under the session-store secret, so the table alone cannot be replayed
//! as cookies. Only authenticated sessions are ever written.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};
use sha2::{Digest, Sha256};

use crate::config;
use crate::db::LogOnError;
use crate::domain::Role;

/// Name of the signed session cookie
pub const SESSION_COOKIE_NAME: &str = "veggie_session";

/// Persisted session fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub authenticated: bool,
    pub name: String,
    pub user_type: Role,
}

impl SessionData {
    pub fn authenticated(name: impl Into<String>, user_type: Role) -> Self {
        Self {
            authenticated: true,
            name: name.into(),
            user_type,
        }
    }
}

/// Session attached to every request by the session middleware.
/// Anonymous sessions have no id and are never stored.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub id: Option<String>,
    pub data: SessionData,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True iff the session is authenticated
    pub fn is_valid(&self) -> bool {
        self.data.authenticated
    }

    /// True iff the session's role is admin
    pub fn is_admin(&self) -> bool {
        self.data.user_type == Role::Admin
    }

    /// Display name when authenticated
    pub fn name(&self) -> Option<&str> {
        self.is_valid().then_some(self.data.name.as_str())
    }
}

/// Store row key for a cookie session id
pub fn store_key(secret: &str, session_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(session_id.as_bytes());
    hex::encode(hasher.finalize())
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Persist a session for the standard lifetime
pub fn save_session(
    conn: &Connection,
    secret: &str,
    session_id: &str,
    data: &SessionData,
) -> Result<()> {
    let expires = Utc::now() + Duration::hours(config::SESSION_EXPIRY_HOURS);
    save_session_until(conn, secret, session_id, data, expires)
}

/// Persist a session that expires at `expires_at`, replacing any existing row
pub fn save_session_until(
    conn: &Connection,
    secret: &str,
    session_id: &str,
    data: &SessionData,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    let now = timestamp(Utc::now());
    conn.execute(
        r#"INSERT OR REPLACE INTO sessions
           (id, authenticated, name, user_type, created_at, expires_at, last_access_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?5)"#,
        params![
            store_key(secret, session_id),
            data.authenticated,
            data.name,
            data.user_type.as_str(),
            now,
            timestamp(expires_at),
        ],
    )?;
    Ok(())
}

/// Load an unexpired session and touch its last access time
pub fn load_session(
    conn: &Connection,
    secret: &str,
    session_id: &str,
) -> Result<Option<SessionData>> {
    let key = store_key(secret, session_id);
    let now = timestamp(Utc::now());

    let data = conn
        .query_row(
            "SELECT authenticated, name, user_type FROM sessions WHERE id = ?1 AND expires_at > ?2",
            params![key, now],
            |row| {
                Ok(SessionData {
                    authenticated: row.get(0)?,
                    name: row.get(1)?,
                    user_type: Role::from_str(&row.get::<_, String>(2)?),
                })
            },
        )
        .optional()?;

    if data.is_some() {
        conn.execute(
            "UPDATE sessions SET last_access_at = ?1 WHERE id = ?2",
            params![now, key],
        )
        .log_warn("Failed to touch session");
    }

    Ok(data)
}

/// Delete a session (logout)
pub fn delete_session(conn: &Connection, secret: &str, session_id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM sessions WHERE id = ?1",
        params![store_key(secret, session_id)],
    )?;
    Ok(())
}

/// Cleanup expired sessions, returns count of deleted sessions
pub fn cleanup_expired_sessions(conn: &Connection) -> Result<usize> {
    let now = timestamp(Utc::now());
    conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])
}

/// Sweep expired sessions on a fraction of calls
pub fn maybe_cleanup_expired(conn: &Connection) {
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
        let removed = cleanup_expired_sessions(conn).log_warn_default("Session sweep failed");
        if removed > 0 {
            tracing::debug!("Removed {} expired sessions", removed);
        }
    }
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..32)
        .map(|_| {
            let idx = rng.random_range(0..36);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect()
}
