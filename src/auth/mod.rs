//! Authentication: password hashing, bearer tokens and the request guard

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{Claims, TokenService};
pub use middleware::{authenticate, bearer_token, require_auth};
pub use models::{AuthUser, HashedPassword, User, UserInfo};
pub use password::PasswordHasher;
