use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Stored password hash is malformed")]
    MalformedHash,

    #[error("Iteration count too low: minimum {minimum}, got {actual}")]
    IterationsTooLow { minimum: u32, actual: u32 },
}
