pub mod user;

pub use user::{Role, UserCredentials, UserSummary};
