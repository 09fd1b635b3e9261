use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenIssuer;
use crate::jwt::DEFAULT_TOKEN_TTL_HOURS;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_ttl: Duration,
}

/// Identity asserted by an issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: String,
    pub display_name: String,
}

impl Identity {
    pub fn new(role: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            display_name: display_name.into(),
        }
    }
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
///
/// A wrong password and a corrupt stored hash both surface as
/// `InvalidCredentials`; the cause is only logged.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with the default hasher and a one day token lifetime.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_hasher(
            jwt_secret,
            PasswordHasher::new(),
            Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        )
    }

    /// Create an authenticator with an explicit hasher and token lifetime.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `password_hasher` - Configured password hasher
    /// * `token_ttl` - Lifetime of issued tokens
    pub fn with_hasher(
        jwt_secret: &[u8],
        password_hasher: PasswordHasher,
        token_ttl: Duration,
    ) -> Self {
        Self {
            password_hasher,
            token_issuer: TokenIssuer::new(jwt_secret),
            token_ttl,
        }
    }

    /// Build an authenticator from deployment settings.
    ///
    /// # Errors
    /// * `IterationsTooLow` - `iterations` is below the accepted minimum
    pub fn from_settings(
        jwt_secret: &[u8],
        iterations: u32,
        token_ttl: Duration,
    ) -> Result<Self, PasswordError> {
        let password_hasher = PasswordHasher::new().with_iterations(iterations)?;
        Ok(Self::with_hasher(jwt_secret, password_hasher, token_ttl))
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Encoded password hash
    pub fn hash_password(&self, password: &str) -> String {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `identity`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Role and display name to assert in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or the stored hash is unusable
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &Identity,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(reason = "mismatch", "Password verification failed");
                return Err(AuthenticationError::InvalidCredentials);
            }
            Err(e) => {
                tracing::warn!(reason = %e, "Password verification failed");
                return Err(AuthenticationError::InvalidCredentials);
            }
        }

        let access_token = self.generate_token(identity)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Check a password against a stored hash without issuing a token.
    ///
    /// An unusable stored hash counts as a mismatch; it still costs one full
    /// derivation.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher
            .verify(password, stored_hash)
            .unwrap_or(false)
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, identity: &Identity) -> Result<String, JwtError> {
        self.token_issuer
            .issue(&identity.role, &identity.display_name, self.token_ttl)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with this secret or was altered
    /// * `Expired` - Token lifetime has elapsed
    /// * `Malformed` - Token cannot be decoded
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_issuer.validate(token)
    }
}
