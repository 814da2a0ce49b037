//! Authentication module
//!
//! Bearer credential validation and role gating. Token issuance and login
//! are handled by the external identity service sharing the JWT secret.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{generate_token, validate_token, Claims};
pub use middleware::{authenticate, require_roles, AuthUser};
pub use password::hash_password;
