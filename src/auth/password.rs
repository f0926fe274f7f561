//! Password hashing
//!
//! Salted bcrypt hashes with a fixed work factor chosen at startup.

use thiserror::Error;

/// Password hashing errors
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// bcrypt hasher with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher. The cost is clamped to the range bcrypt accepts.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        bcrypt::verify(plaintext, hashed).unwrap_or(false)
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

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordHasher::new(4);
        let hashed = hasher.hash("pw").unwrap();

        assert_ne!(hashed, "pw");
        assert!(hasher.verify("pw", &hashed));
        assert!(!hasher.verify("wrong", &hashed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(4);
        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first));
        assert!(hasher.verify("same-password", &second));
    }

    #[test]
    fn test_verify_garbage_hash_is_false() {
        let hasher = PasswordHasher::new(4);
        assert!(!hasher.verify("pw", "not-a-bcrypt-hash"));
        assert!(!hasher.verify("pw", ""));
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(PasswordHasher::new(1).cost(), 4);
        assert_eq!(PasswordHasher::new(99).cost(), 31);
        assert_eq!(PasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }
}
