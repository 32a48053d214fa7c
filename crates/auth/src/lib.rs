//! Authentication for shelf: password policy and hashing, bearer tokens,
//! the register/login service, and the axum middleware that resolves the
//! caller's identity.

pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use middleware::{authenticate, CurrentUser};
pub use password::is_password_allowed;
pub use service::{AuthService, AuthenticatedUser, LoginForm};
