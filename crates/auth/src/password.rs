//! Password strength policy and Argon2id hashing.

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};

use shelf_kernel::settings::AuthSettings;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Accepts a password of at least six characters containing a lowercase
/// letter, an uppercase letter, a digit, and a non-alphanumeric character.
pub fn is_password_allowed(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Argon2id hasher with configurable cost parameters.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    // hashed with the live parameters so a miss costs as much as a hit
    decoy: String,
}

impl CredentialHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> anyhow::Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| anyhow!("invalid argon2 parameters: {e}"))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, "shelf-decoy-credential")?;
        Ok(Self { argon2, decoy })
    }

    pub fn from_settings(settings: &AuthSettings) -> anyhow::Result<Self> {
        Self::new(
            settings.hash_memory_kib,
            settings.hash_iterations,
            settings.hash_parallelism,
        )
    }

    /// Hash a password into a PHC-formatted string.
    pub fn hash(&self, password: &str) -> anyhow::Result<String> {
        hash_with(&self.argon2, password)
    }

    /// Check a password against a stored PHC hash.
    pub fn verify(&self, password: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow!("invalid password hash: {e}"))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Run a full verification against a hash no password matches. Used when
    /// the account does not exist, so both outcomes take the same time.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, &self.decoy);
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("failed to hash password: {e}"))
}
