//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the user service:
//! - Password hashing (salted PBKDF2, constant-time verification)
//! - Access token issuance and validation (HS256 JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Secr3t!pass");
//! assert_eq!(hasher.verify("Secr3t!pass", &hash), Ok(true));
//! assert_eq!(hasher.verify("wrong", &hash), Ok(false));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let token = issuer.issue("User", "Jane:Doe", Duration::days(1)).unwrap();
//! let claims = issuer.validate(&token).unwrap();
//! assert_eq!(claims.display_name, "Jane:Doe");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Identity};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("Secr3t!pass");
//!
//! // Login: verify and generate token
//! let identity = Identity::new("User", "Jane:Doe");
//! let result = auth.authenticate("Secr3t!pass", &hash, &identity).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.role, "User");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::Identity;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use password::OsRandom;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::RandomSource;
