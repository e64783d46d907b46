/// Coarse authorization tag stored as `user_type`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
  #[default]
  User,
  Admin,
}

impl Role {
  /// Unknown values fall back to `User`
  pub fn from_str(s: &str) -> Self {
    match s {
      "admin" => Self::Admin,
      _ => Self::User,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Admin => "admin",
    }
  }
}

impl std::fmt::Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Login projection of a user row
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub id: i64,
  pub name: String,
  /// Argon2 PHC string
  pub password: String,
  pub user_type: Role,
}

/// Admin listing projection of a user row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
  pub id: i64,
  pub name: String,
  pub user_type: Role,
}

impl UserSummary {
  pub fn is_admin(&self) -> bool {
    self.user_type == Role::Admin
  }

  pub fn promote_href(&self) -> String {
    format!("/admin/promote?name={}", urlencoding::encode(&self.name))
  }

  pub fn demote_href(&self) -> String {
    format!("/admin/demote?name={}", urlencoding::encode(&self.name))
  }
}
