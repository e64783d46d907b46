//! User repository over the `users` table.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

use crate::domain::{Role, UserCredentials, UserSummary};

/// Insert a new user, returns the user ID. No duplicate check.
pub fn insert_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO users (name, email, password, user_type, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, email, password_hash, role.as_str(), now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All users registered under an email. Callers decide what more than one match means.
pub fn find_users_by_email(conn: &Connection, email: &str) -> Result<Vec<UserCredentials>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, password, user_type FROM users WHERE email = ?1 ORDER BY id",
    )?;
    let users = stmt
        .query_map(params![email], |row| {
            Ok(UserCredentials {
                id: row.get(0)?,
                name: row.get(1)?,
                password: row.get(2)?,
                user_type: Role::from_str(&row.get::<_, String>(3)?),
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(users)
}

/// Get all users for admin display, oldest first
pub fn list_users(conn: &Connection) -> Result<Vec<UserSummary>> {
    let mut stmt = conn.prepare("SELECT id, name, user_type FROM users ORDER BY id")?;
    let users = stmt
        .query_map([], |row| {
            Ok(UserSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                user_type: Role::from_str(&row.get::<_, String>(2)?),
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(users)
}

/// Set the role of the first user (lowest id) with this name.
/// Returns the number of rows changed; 0 when no user matches.
pub fn set_role(conn: &Connection, name: &str, role: Role) -> Result<usize> {
    conn.execute(
        r#"UPDATE users SET user_type = ?1
           WHERE id = (SELECT id FROM users WHERE name = ?2 ORDER BY id LIMIT 1)"#,
        params![role.as_str(), name],
    )
}

/// Get user count
pub fn count_users(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}
