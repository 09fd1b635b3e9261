use rand::rngs::OsRng;
use rand::RngCore;

/// Source of random bytes used for salt generation.
///
/// Implementations must be safe to call concurrently. A failure to produce
/// randomness is not recoverable and may panic.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]);
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}
