use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha1::Sha1;
use subtle::ConstantTimeEq;

use super::errors::PasswordError;
use super::random::OsRandom;
use super::random::RandomSource;

/// Salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// Derived key length in bytes.
pub const HASH_SIZE: usize = 20;

/// Iteration count used unless a deployment configures a higher one.
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Lowest iteration count accepted by [`PasswordHasher::with_iterations`].
pub const MIN_ITERATIONS: u32 = 10_000;

const ENCODED_SIZE: usize = SALT_SIZE + HASH_SIZE;

/// Salted PBKDF2 password hashing.
///
/// Hashes are `base64(salt || derived_key)` with a 16 byte salt and a 20 byte
/// PBKDF2-HMAC-SHA1 key. The iteration count is not stored in the hash, so
/// every record of a deployment must be verified with the count it was
/// hashed with.
#[derive(Debug, Clone)]
pub struct PasswordHasher<R = OsRandom> {
    random: R,
    iterations: u32,
}

impl PasswordHasher {
    /// Create a new password hasher backed by the OS random generator.
    ///
    /// # Returns
    /// PasswordHasher using [`DEFAULT_ITERATIONS`]
    pub fn new() -> Self {
        Self::with_random_source(OsRandom)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> PasswordHasher<R> {
    /// Create a password hasher drawing salts from `random`.
    pub fn with_random_source(random: R) -> Self {
        Self {
            random,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Override the iteration count.
    ///
    /// # Errors
    /// * `IterationsTooLow` - `iterations` is below [`MIN_ITERATIONS`]
    pub fn with_iterations(mut self, iterations: u32) -> Result<Self, PasswordError> {
        if iterations < MIN_ITERATIONS {
            return Err(PasswordError::IterationsTooLow {
                minimum: MIN_ITERATIONS,
                actual: iterations,
            });
        }
        self.iterations = iterations;
        Ok(self)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Base64 encoding of the salt followed by the derived key
    pub fn hash(&self, password: &str) -> String {
        let mut encoded = [0u8; ENCODED_SIZE];
        let (salt, key) = encoded.split_at_mut(SALT_SIZE);
        self.random.fill(salt);
        self.derive(password, salt, key);

        STANDARD.encode(encoded)
    }

    /// Verify a password against a stored hash.
    ///
    /// The derived key is compared in constant time. A malformed hash costs
    /// the same key derivation as a well-formed one.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `encoded_hash` - Hash previously produced by [`PasswordHasher::hash`]
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Hash is not valid base64 or has the wrong length
    pub fn verify(&self, password: &str, encoded_hash: &str) -> Result<bool, PasswordError> {
        let mut derived = [0u8; HASH_SIZE];

        let Some(stored) = decode(encoded_hash) else {
            self.derive(password, &[0u8; SALT_SIZE], &mut derived);
            return Err(PasswordError::MalformedHash);
        };

        let (salt, expected) = stored.split_at(SALT_SIZE);
        self.derive(password, salt, &mut derived);

        Ok(derived[..].ct_eq(expected).into())
    }

    fn derive(&self, password: &str, salt: &[u8], out: &mut [u8]) {
        pbkdf2::pbkdf2_hmac::<Sha1>(password.as_bytes(), salt, self.iterations, out);
    }
}

fn decode(encoded_hash: &str) -> Option<[u8; ENCODED_SIZE]> {
    let bytes = STANDARD.decode(encoded_hash).ok()?;
    <[u8; ENCODED_SIZE]>::try_from(bytes).ok()
}
