//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Longest username the users table accepts
pub const MAX_USERNAME_LEN: usize = 80;

/// A bcrypt hash of a password.
///
/// Only [`PasswordHasher`](crate::auth::PasswordHasher) produces these from raw
/// input, so the store can never be handed a plaintext password.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash that was read back from storage
    pub(crate) fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// A registered user as stored in the users table
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: HashedPassword,
    pub email: Option<String>,
}

/// Identity attached to requests that passed the auth middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Registration payload. Fields are optional so that missing ones become
/// validation errors instead of deserialization rejections.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Login credentials
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Username and password after presence checks
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// Split into checked credentials and a normalised email
    pub fn validate(self) -> Result<(Credentials, Option<String>)> {
        let credentials = require_credentials(self.username, self.password)?;
        if credentials.username.chars().count() > MAX_USERNAME_LEN {
            return Err(Error::Validation(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LEN
            )));
        }
        let email = self
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Ok((credentials, email))
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials> {
        require_credentials(self.username, self.password)
    }
}

fn require_credentials(username: Option<String>, password: Option<String>) -> Result<Credentials> {
    let username = username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    let password = password.filter(|p| !p.trim().is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Ok(Credentials { username, password }),
        _ => Err(Error::Validation(
            "Username and password are required".to_string(),
        )),
    }
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response with token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
}

/// Response for the protected probe endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
}

/// User information in responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}
