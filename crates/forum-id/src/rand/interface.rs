/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. Callers mask the result down to the bits they
/// need, so implementations should fill all 128 bits.
///
/// # Example
/// ```
/// use forum_id::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&self) -> u128 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource {
    /// Returns a random integer.
    fn rand(&self) -> u128;
}

impl<R: RandSource + ?Sized> RandSource for alloc::sync::Arc<R> {
    fn rand(&self) -> u128 {
        (**self).rand()
    }
}
