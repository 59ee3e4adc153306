//! JWT Claims structure
//!
//! Defines the claims structure used in JWT tokens for authentication.
//! The booking core takes the acting user's identity from these claims.

use chrono::{Duration, Utc};
use nido_core::models::UserRole;
use serde::{Deserialize, Serialize};

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user id)
    pub sub: i32,

    /// Display name
    pub name: String,

    /// User role
    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims for a user
    ///
    /// # Examples
    ///
    /// ```
    /// use nido_auth::Claims;
    /// use nido_core::models::UserRole;
    ///
    /// let claims = Claims::new(42, "Ana", UserRole::Member);
    /// assert_eq!(claims.sub, 42);
    /// ```
    pub fn new(user_id: i32, name: &str, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            name: name.to_string(),
            role,
            iat: now.timestamp(),
            exp: 0, // Will be set by JwtService
        }
    }

    /// Create new claims with a custom expiration offset in seconds
    pub fn with_expiration(user_id: i32, name: &str, role: UserRole, expires_in_secs: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_secs);

        Self {
            sub: user_id,
            name: name.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.exp != 0 && self.exp < Utc::now().timestamp()
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}
