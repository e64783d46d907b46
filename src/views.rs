//! Askama views and the shared layout context.

use askama::Template;
use axum::response::Html;

use crate::domain::UserSummary;
use crate::error::AppResult;

pub struct NavLink {
  pub name: &'static str,
  pub link: &'static str,
}

/// Links shown in the layout header
pub const NAV_LINKS: &[NavLink] = &[
  NavLink { name: "Home", link: "/" },
  NavLink { name: "Vegetables", link: "/members" },
  NavLink { name: "Login", link: "/login" },
  NavLink { name: "Admin", link: "/admin" },
  NavLink { name: "404", link: "/404" },
];

/// Layout context every view carries
pub struct Page {
  pub current_path: String,
  pub nav_links: &'static [NavLink],
}

impl Page {
  pub fn new(current_path: impl Into<String>) -> Self {
    Self {
      current_path: current_path.into(),
      nav_links: NAV_LINKS,
    }
  }

  pub fn is_current(&self, link: &NavLink) -> bool {
    self.current_path == link.link
  }
}

pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
  Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub page: Page,
  pub logged_in: bool,
  pub name: String,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
  pub page: Page,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
  pub page: Page,
}

/// Signup rejected by validation; echoes name and email, never the password
#[derive(Template)]
#[template(path = "signup_submit.html")]
pub struct SignupSubmitTemplate {
  pub page: Page,
  pub error_tag: String,
  pub message: String,
  pub name: String,
  pub email: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
  pub page: Page,
}

#[derive(Template)]
#[template(path = "login_submit.html")]
pub struct LoginSubmitTemplate {
  pub page: Page,
  pub error: &'static str,
}

#[derive(Template)]
#[template(path = "members.html")]
pub struct MembersTemplate {
  pub page: Page,
  pub name: String,
  pub picture: &'static str,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
  pub page: Page,
  pub users: Vec<UserSummary>,
}

#[derive(Template)]
#[template(path = "error_message.html")]
pub struct ErrorTemplate {
  pub page: Page,
  pub error: String,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
  pub page: Page,
}
