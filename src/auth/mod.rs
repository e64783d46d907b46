//! Signup, login and logout, plus the session guards.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod validation;

pub use handlers::*;
pub use middleware::{load_session, require_admin, require_session, CurrentSession};
