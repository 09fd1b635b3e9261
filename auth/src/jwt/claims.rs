use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims asserted by an access token.
///
/// The display name travels as `unique_name`, the registered name claim of
/// compact tokens minted by other stacks, so tokens stay interchangeable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Flat role tag (e.g. "User", "Admin")
    pub role: String,

    /// Human readable identity, "first:last" for registered users
    #[serde(rename = "unique_name")]
    pub display_name: String,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims valid from `issued_at` for `ttl`.
    ///
    /// # Arguments
    /// * `role` - Role tag
    /// * `display_name` - Display name
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Lifetime; a negative value produces already expired claims
    pub fn new(
        role: impl ToString,
        display_name: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            role: role.to_string(),
            display_name: display_name.to_string(),
            nbf: issued_at.timestamp(),
            exp: expiration.timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    /// Expiration instant, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
