pub mod errors;
pub mod hasher;
pub mod random;

pub use errors::PasswordError;
pub use hasher::PasswordHasher;
pub use random::OsRandom;
pub use random::RandomSource;
