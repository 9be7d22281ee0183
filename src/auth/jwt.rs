//! JWT token handling

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time, absent when expiry is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create claims for a user, expiring after `ttl` if given
    pub fn for_user(user_id: i64, ttl: Option<Duration>) -> Result<Self> {
        let now = chrono::Utc::now().timestamp();
        let exp = match ttl {
            Some(ttl) => Some(
                i64::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| now.checked_add(secs))
                    .ok_or_else(|| {
                        Error::Config(format!("Token lifetime of {}s is out of range", ttl.as_secs()))
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            sub: user_id.to_string(),
            iat: now,
            exp,
        })
    }

    /// The user id carried in `sub`
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::InvalidToken("subject is not a user id".to_string()))
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| chrono::Utc::now().timestamp() > exp)
            .unwrap_or(false)
    }
}

/// Issues and verifies signed bearer tokens
#[derive(Clone)]
pub struct TokenService {
    secret: Option<Vec<u8>>,
    ttl: Option<Duration>,
}

impl TokenService {
    pub fn new(secret: Option<&str>, ttl: Option<Duration>) -> Self {
        Self {
            secret: secret.map(|s| s.as_bytes().to_vec()),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.secret(), config.token_ttl())
    }

    /// Whether issued tokens carry an expiry
    pub fn expires(&self) -> bool {
        self.ttl.is_some()
    }

    fn secret(&self) -> Result<&[u8]> {
        self.secret.as_deref().ok_or(Error::MissingSecret)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if self.ttl.is_none() {
            validation.validate_exp = false;
            validation.required_spec_claims.clear();
        }
        validation
    }

    /// Create a token binding `user_id`
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.encode_claims(&Claims::for_user(user_id, self.ttl)?)
    }

    /// Sign arbitrary claims with the configured secret
    pub fn encode_claims(&self, claims: &Claims) -> Result<String> {
        let secret = self.secret()?;
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| Error::Config(format!("Failed to create token: {}", e)))
    }

    /// Validate and decode a token
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let secret = self.secret()?;
        decode::<Claims>(token, &DecodingKey::from_secret(secret), &self.validation())
            .map(|data| data.claims)
            .map_err(|e| Error::InvalidToken(e.to_string()))
    }

    /// Validate a token and return the user id it binds
    pub fn verify(&self, token: &str) -> Result<i64> {
        self.decode(token)?.user_id()
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("ttl", &self.ttl)
            .finish()
    }
}
