//! Admin authentication

pub mod middleware;

pub use middleware::{ADMIN_TOKEN_HEADER, extract_token, require_admin};
