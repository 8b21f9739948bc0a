//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{extract_token, require_auth, CurrentUser};
pub use ownership::{assert_owner, OwnedAction};
pub use password::PasswordHasher;
