use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Token lifetime used when a deployment does not configure one.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Issues and validates HS256 access tokens.
///
/// Validation is stateless: a token is accepted until its `exp` claim passes,
/// with no leeway. Issuer and audience are not checked.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenIssuer {
    /// Create a new token issuer with a shared secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
        }
    }

    /// Issue a token asserting `role` and `display_name`.
    ///
    /// # Arguments
    /// * `role` - Role claim
    /// * `display_name` - Display name claim
    /// * `ttl` - Time until the token expires, counted from now
    ///
    /// # Returns
    /// Compact JWT string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, role: &str, display_name: &str, ttl: Duration) -> Result<String, JwtError> {
        let claims = Claims::new(role, display_name, Utc::now(), ttl);
        self.encode(&claims)
    }

    /// Sign prepared claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Arguments
    /// * `token` - JWT token string to validate
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match the payload under this secret
    /// * `Expired` - Current time is past the `exp` claim
    /// * `Malformed` - Token is not a decodable HS256 JWT with the expected claims
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_validate() {
        let issuer = TokenIssuer::new(SECRET);

        let token = issuer
            .issue("User", "Jane:Doe", Duration::days(1))
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = issuer.validate(&token).expect("Failed to validate token");
        assert_eq!(claims.role, "User");
        assert_eq!(claims.display_name, "Jane:Doe");

        let expires_at = claims.expires_at().unwrap();
        let remaining = expires_at - Utc::now();
        assert!(remaining > Duration::hours(23));
        assert!(remaining <= Duration::days(1));
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let issuer = TokenIssuer::new(SECRET);
        let other = TokenIssuer::new(b"another_secret_at_least_32_bytes_long");

        let token = issuer.issue("User", "Jane:Doe", Duration::days(1)).unwrap();

        assert_eq!(other.validate(&token), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_validate_expired_token() {
        let issuer = TokenIssuer::new(SECRET);

        let token = issuer
            .issue("User", "Jane:Doe", Duration::seconds(-1))
            .unwrap();

        assert_eq!(issuer.validate(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_wrong_secret_checked_before_expiry() {
        let issuer = TokenIssuer::new(SECRET);
        let other = TokenIssuer::new(b"another_secret_at_least_32_bytes_long");

        let token = issuer
            .issue("User", "Jane:Doe", Duration::seconds(-1))
            .unwrap();

        assert_eq!(other.validate(&token), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_any_bit_flip_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue("User", "Jane:Doe", Duration::days(1)).unwrap();
        let bytes = token.as_bytes();

        for index in 0..bytes.len() {
            // Bits 0..=6 keep the byte ASCII, so the token stays a valid &str.
            for bit in 0..7 {
                let mut tampered = bytes.to_vec();
                tampered[index] ^= 1 << bit;
                let tampered = String::from_utf8(tampered).unwrap();

                assert!(
                    issuer.validate(&tampered).is_err(),
                    "flip of bit {} at byte {} was accepted",
                    bit,
                    index
                );
            }
        }
    }

    #[test]
    fn test_mutated_claims_invalidate_signature() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue("User", "Jane:Doe", Duration::days(1)).unwrap();
        let admin = issuer.issue("Admin", "Jane:Doe", Duration::days(1)).unwrap();

        // Splice the admin payload under the user signature.
        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert_eq!(issuer.validate(&forged), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_validate_garbage() {
        let issuer = TokenIssuer::new(SECRET);

        assert!(matches!(
            issuer.validate("invalid.token.here"),
            Err(JwtError::Malformed(_))
        ));
        assert!(matches!(issuer.validate(""), Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_token_without_expiry_rejected() {
        #[derive(serde::Serialize)]
        struct NoExpiry {
            role: String,
            unique_name: String,
        }

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &NoExpiry {
                role: "User".to_string(),
                unique_name: "Jane:Doe".to_string(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let issuer = TokenIssuer::new(SECRET);
        assert!(matches!(issuer.validate(&token), Err(JwtError::Malformed(_))));
    }
}
