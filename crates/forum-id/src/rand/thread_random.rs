use crate::RandSource;
use rand::{Rng, rng};

/// A `RandSource` backed by the thread-local RNG (`rand::rng()`).
///
/// The generator is cryptographically secure (ChaCha-based) and reseeded
/// periodically from the OS, which is what random token and identifier bits
/// require.
///
/// This type does **not** store the RNG; it reaches for the calling thread's
/// generator on each call, so it is `Send + Sync` and contention-free.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&self) -> u128 {
        rng().random()
    }
}
