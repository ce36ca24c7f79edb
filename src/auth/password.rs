use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::Error;

/// One-way password hashing with a deployment-wide secret pepper.
///
/// The pepper is fed to argon2 as its keyed secret input, so every digest
/// depends on both the per-hash random salt and the shared secret. A
/// digest produced here only verifies through a hasher holding the same
/// pepper.
pub struct CredentialHasher {
    pepper: String,
}

impl CredentialHasher {
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, Error> {
        Argon2::new_with_secret(
            self.pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| {
            error!(error = %e, "argon2 rejected pepper");
            Error::Hash(e.to_string())
        })
    }

    /// Hash a clear-text password into a PHC-formatted digest.
    pub fn hash(&self, password: &str) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                Error::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Check a candidate password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; a malformed digest or algorithm failure
    /// is an error.
    pub fn verify(&self, digest: &str, password: &str) -> Result<bool, Error> {
        let parsed = PasswordHash::new(digest).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            Error::Hash(e.to_string())
        })?;
        match self.argon2()?.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!(error = %e, "argon2 verify error");
                Err(Error::Hash(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new("unit-test-pepper")
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hasher().hash(password).expect("hashing should succeed");
        assert!(hasher()
            .verify(&hash, password)
            .expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hasher().hash(password).expect("hashing should succeed");
        assert!(!hasher()
            .verify(&hash, "wrong-password")
            .expect("verify should not error"));
    }

    #[test]
    fn verify_rejects_other_pepper() {
        let hash = hasher().hash("pw").expect("hashing should succeed");
        let other = CredentialHasher::new("another-pepper");
        assert!(!other.verify(&hash, "pw").expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_digest() {
        let err = hasher().verify("not-a-valid-hash", "anything").unwrap_err();
        assert!(matches!(err, Error::Hash(_)));
    }

    #[test]
    fn hash_is_salted() {
        let h1 = hasher().hash("same-password").unwrap();
        let h2 = hasher().hash("same-password").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn hash_never_contains_clear_text() {
        let hash = hasher().hash("visible-password").unwrap();
        assert!(!hash.contains("visible-password"));
        assert!(hash.starts_with("$argon2id$"));
    }
}
