//! Credential hashing.
//!
//! New accounts always store an scrypt PHC string. Rows typed into the sheet
//! by hand may still hold a plaintext secret; those keep working.

use crate::errors::{AppError, AppResult};
use scrypt::{
    Params, Scrypt,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

const PHC_PREFIX: &str = "$scrypt$";

#[derive(Clone, Copy)]
pub struct SecretHasher {
    params: Params,
}

impl SecretHasher {
    /// `log_n` is the scrypt cost exponent (memory grows as 2^log_n * 1 KiB).
    pub fn new(log_n: u8) -> AppResult<Self> {
        let params = Params::new(log_n, 8, 1, 32)
            .map_err(|e| AppError::Config(format!("invalid scrypt cost {log_n}: {e}")))?;
        Ok(Self { params })
    }

    pub fn hash(&self, secret: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hashed = Scrypt
            .hash_password_customized(secret.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| AppError::Other(format!("hashing failed: {e}")))?;

        Ok(hashed.to_string())
    }

    /// Check `secret` against a stored credential (PHC hash or plaintext).
    pub fn verify(stored: &str, secret: &str) -> bool {
        if stored.starts_with(PHC_PREFIX) {
            match PasswordHash::new(stored) {
                Ok(parsed) => Scrypt.verify_password(secret.as_bytes(), &parsed).is_ok(),
                Err(_) => false,
            }
        } else {
            stored == secret
        }
    }

    pub fn is_hashed(stored: &str) -> bool {
        stored.starts_with(PHC_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_and_plaintext_credentials_verify() {
        let hasher = SecretHasher::new(4).unwrap();
        let stored = hasher.hash("pw1").unwrap();

        assert!(SecretHasher::is_hashed(&stored));
        assert!(SecretHasher::verify(&stored, "pw1"));
        assert!(!SecretHasher::verify(&stored, "pw2"));

        assert!(SecretHasher::verify("legacy", "legacy"));
        assert!(!SecretHasher::verify("legacy", "Legacy"));
    }

    #[test]
    fn broken_hash_never_verifies() {
        assert!(!SecretHasher::verify("$scrypt$garbage", "$scrypt$garbage"));
    }
}
