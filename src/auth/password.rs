use argon2::password_hash::Output;
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;

use crate::config::HashConfig;
use crate::error::{Error, Result};

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Salts and hashes account passwords with Argon2id.
///
/// The salt is stored next to the hash rather than embedded in a PHC string,
/// so the work factor is not recorded per user: changing [`HashConfig`]
/// invalidates every stored password.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(config: HashConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(HASH_LEN),
        )
        .map_err(|e| Error::Config(format!("invalid argon2 params: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Generates a fresh random salt.
    #[must_use]
    pub fn generate_salt(&self) -> Vec<u8> {
        let mut salt = vec![0u8; SALT_LEN];
        rand::thread_rng().fill(&mut salt[..]);
        salt
    }

    pub fn hash(&self, password: &str, salt: &[u8]) -> Result<Vec<u8>> {
        let mut key = vec![0u8; HASH_LEN];
        self.argon2
            .hash_password_into(password.as_bytes(), salt, &mut key)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        Ok(key)
    }

    /// Hashes `password` with `salt` and compares against `expected` in
    /// constant time. A stored hash of unusable length never matches.
    pub fn verify(&self, password: &str, salt: &[u8], expected: &[u8]) -> Result<bool> {
        let Ok(expected) = Output::new(expected) else {
            return Ok(false);
        };
        let key = self.hash(password, salt)?;
        let key = Output::new(&key).map_err(|e| Error::PasswordHash(e.to_string()))?;
        Ok(key == expected)
    }
}
