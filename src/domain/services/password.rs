use crate::domain::errors::{DomainError, DomainResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Argon2id cost factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MiB
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// One-way, salted password hashing with an adjustable cost.
#[derive(Clone)]
pub struct SecretHasher {
    params: Params,
    /// Hash at the configured cost that no real account uses. Unknown login
    /// ids are verified against it so they cost as much as known ones.
    decoy_hash: String,
}

impl SecretHasher {
    pub fn new(cost: HashCost) -> DomainResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| DomainError::ValidationError(format!("Invalid hash cost: {}", e)))?;
        let mut hasher = Self {
            params,
            decoy_hash: String::new(),
        };
        hasher.decoy_hash = hasher.hash_secret("decoy-secret-for-unknown-accounts")?;
        Ok(hasher)
    }

    pub fn hash_secret(&self, plaintext: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| DomainError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Never errors: a malformed hash is simply a mismatch.
    ///
    /// Accounts created by earlier deployments carry bcrypt hashes (`$2a$`,
    /// `$2b$`, `$2y$`); those are still accepted.
    pub fn verify_secret(&self, plaintext: &str, hashed: &str) -> bool {
        if hashed.starts_with("$2") {
            return bcrypt::verify(plaintext, hashed).unwrap_or(false);
        }

        let Ok(parsed_hash) = PasswordHash::new(hashed) else {
            return false;
        };

        // Cost parameters are read back from the PHC string.
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Spends one verification at the configured cost and always fails.
    pub fn verify_decoy(&self, plaintext: &str) -> bool {
        let _ = self.verify_secret(plaintext, &self.decoy_hash);
        false
    }
}

/// 8-100 characters with at least one lowercase letter, one uppercase letter
/// and one special character.
pub fn validate_password_complexity(password: &str) -> DomainResult<()> {
    let len = password.chars().count();
    if !(8..=100).contains(&len) {
        return Err(DomainError::ValidationError(
            "Password must be 8-100 characters long".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(DomainError::ValidationError(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(DomainError::ValidationError(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(DomainError::ValidationError(format!(
            "Password must contain at least one special character ({})",
            SPECIAL_CHARS
        )));
    }

    Ok(())
}
