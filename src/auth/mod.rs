pub mod extractors;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod token;

// Re-export the items handlers and main wiring reach for
pub use extractors::CurrentUser;
pub use middleware::{AuthGate, RoleGuard};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserProfile;

/// Represents the payload for a new user registration request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    /// Must be between 1 and 100 characters; surrounding whitespace is trimmed.
    #[validate(length(min = 1, max = 100, message = "Please provide your name"))]
    pub name: String,
    /// Email address for the new account.
    /// Must be a valid email format; stored lowercased.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Represents the payload for a user login request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    /// Must be a valid email format.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    /// User's password.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT for session authentication.
    pub token: String,
    /// Profile of the authenticated user.
    pub user: UserProfile,
}
