mod login;
mod session;

pub use login::login_handler;
pub use session::{logout_handler, me_handler};

/// Session key holding the authenticated [`orgportal_core::Principal`].
pub const SESSION_PRINCIPAL_KEY: &str = "portal_principal";
/// Absolute session creation timestamp.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Sessions older than this are rejected regardless of activity.
pub const SESSION_MAX_AGE_HOURS: i64 = 12;
