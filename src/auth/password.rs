use sha2::{Digest, Sha256};

/// Hex digest of `SHA-256(pepper || password)`, the form stored in the
/// `password_hash` setting.
pub fn hash_password(pepper: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pepper.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Verifies candidates against the single admin credential
#[derive(Clone)]
pub struct PasswordChecker {
    pepper: String,
    trusted_hash: String,
}

impl PasswordChecker {
    pub fn new(pepper: impl Into<String>, trusted_hash: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
            trusted_hash: trusted_hash.into(),
        }
    }

    pub fn check(&self, candidate: &str) -> bool {
        hash_password(&self.pepper, candidate) == self.trusted_hash
    }
}
