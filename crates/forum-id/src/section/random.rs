use crate::{
    Poll, RandSource, Result, Section, SectionKind,
    codec::{self, MAX_WIDTH},
};

/// Encodes `width * 6` random bits.
///
/// The fragment has no arithmetic meaning; it exists to make tokens
/// unguessable and to separate values minted in the same window by
/// different processes.
#[derive(Debug, Clone)]
pub struct RandomSection<R: RandSource> {
    width: usize,
    mask: u128,
    rng: R,
}

impl<R: RandSource> RandomSection<R> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] unless `1 <= width <= 21`.
    ///
    /// [`Error::InvalidWidth`]: crate::Error::InvalidWidth
    pub fn new(width: usize, rng: R) -> Result<Self> {
        codec::check_width(width, MAX_WIDTH)?;
        Ok(Self {
            width,
            mask: codec::capacity(width) - 1,
            rng,
        })
    }
}

impl<R> Section for RandomSection<R>
where
    R: RandSource + Send + Sync,
{
    fn kind(&self) -> SectionKind {
        SectionKind::Random
    }

    fn width(&self) -> usize {
        self.width
    }

    fn poll_produce(&self, out: &mut String) -> Result<Poll<()>> {
        codec::encode_into(self.rng.rand() & self.mask, self.width, out)?;
        Ok(Poll::Ready { value: () })
    }
}
