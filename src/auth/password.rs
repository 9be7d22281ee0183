//! Password hashing with bcrypt

use std::sync::OnceLock;

use crate::auth::models::HashedPassword;
use crate::error::Result;

/// Hashes and verifies passwords at a fixed bcrypt cost
#[derive(Debug)]
pub struct PasswordHasher {
    cost: u32,
    dummy: OnceLock<Option<HashedPassword>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy: OnceLock::new(),
        }
    }

    /// Salt and hash a raw password
    pub fn hash(&self, password: &str) -> Result<HashedPassword> {
        let hash = bcrypt::hash(password, self.cost)?;
        Ok(HashedPassword::from_stored(hash))
    }

    /// True iff `password` matches `hashed`. A malformed hash never matches.
    pub fn verify(&self, password: &str, hashed: &HashedPassword) -> bool {
        match bcrypt::verify(password, hashed.as_str()) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Stored password hash could not be checked: {}", e);
                false
            }
        }
    }

    /// Spend the same work as a real verification when the user does not exist
    pub fn verify_dummy(&self, password: &str) {
        let dummy = self
            .dummy
            .get_or_init(|| self.hash("gatekeep-dummy-password").ok());
        if let Some(hashed) = dummy {
            let _ = self.verify(password, hashed);
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hashed = hasher.hash("testpass123").expect("hash");
        assert_ne!(hashed.as_str(), "testpass123");
        assert!(hasher.verify("testpass123", &hashed));
        assert!(!hasher.verify("wrongpass", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let a = hasher.hash("same").expect("hash");
        let b = hasher.hash("same").expect("hash");
        assert_ne!(a, b);
        assert!(hasher.verify("same", &a));
        assert!(hasher.verify("same", &b));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let hasher = hasher();
        let bogus = HashedPassword::from_stored("not-a-bcrypt-hash".to_string());
        assert!(!hasher.verify("anything", &bogus));
    }

    #[test]
    fn test_hash_uses_configured_cost() {
        let hashed = hasher().hash("pw").expect("hash");
        assert!(hashed.as_str().starts_with("$2b$04$"));
    }
}
