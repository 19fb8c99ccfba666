//! Admin access: who may log in, and how a logged-in admin is recognised.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use session::{AdminSession, ADMIN_COOKIE, DASHBOARD_PATH, LOGIN_PATH};
