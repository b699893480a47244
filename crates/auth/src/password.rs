//! One-way password hashing (PBKDF2-HMAC-SHA256, PHC string format).

use password_hash::{PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use rand_core::OsRng;

use crate::AuthError;

/// Stored password hash, e.g. `$pbkdf2-sha256$i=600000,l=32$<salt>$<hash>`.
///
/// Deliberately not `Serialize` and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash string loaded from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Hashes new passwords and verifies candidates against stored hashes.
///
/// Verification reads the round count from the stored hash, so changing
/// `rounds` only affects new hashes.
#[derive(Debug, Clone, Copy)]
pub struct Passwords {
    rounds: u32,
}

impl Passwords {
    pub const DEFAULT_ROUNDS: u32 = 600_000;

    pub fn new(rounds: u32) -> Self {
        Self { rounds: rounds.max(1) }
    }

    pub fn hash(&self, plain: &str) -> Result<PasswordHash, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params {
            rounds: self.rounds,
            output_length: 32,
        };
        let hash = Pbkdf2
            .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(PasswordHash(hash.to_string()))
    }

    pub fn verify(&self, plain: &str, stored: &PasswordHash) -> bool {
        let parsed = match PhcString::new(stored.as_str()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("stored password hash is unreadable: {e}");
                return false;
            }
        };
        Pbkdf2.verify_password(plain.as_bytes(), &parsed).is_ok()
    }
}

impl Default for Passwords {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROUNDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Passwords {
        Passwords::new(1_000)
    }

    #[test]
    fn hash_never_contains_the_password() {
        let hash = fast().hash("hunter2").unwrap();
        assert!(hash.as_str().starts_with("$pbkdf2-sha256$"));
        assert!(!hash.as_str().contains("hunter2"));
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[test]
    fn verify_accepts_only_the_original_password() {
        let passwords = fast();
        let hash = passwords.hash("correct horse").unwrap();
        assert!(passwords.verify("correct horse", &hash));
        assert!(!passwords.verify("correct horse ", &hash));
        assert!(!passwords.verify("", &hash));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let passwords = fast();
        let a = passwords.hash("pw").unwrap();
        let b = passwords.hash("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unreadable_stored_hash_never_verifies() {
        assert!(!fast().verify("pw", &PasswordHash::from_stored("plaintext-pw")));
    }
}
