//! Opaque string tokens composed from [`Section`]s.

use alloc::{boxed::Box, vec::Vec};
use core::{fmt, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    CounterSection, Error, Generator, Poll, RandSource, RandomSection, Result, Section,
    SectionKind, ThreadRandom, TimeSource, TimestampSection,
};

/// Concatenates the fragments of an ordered list of sections into one
/// token.
///
/// Tokens are for values that must be unique or unguessable but are not
/// storage keys: session tokens, one-time sign-in codes, anonymous handles.
/// Every token from one generator has the same length, [`TokenGenerator::width`].
///
/// A token is all or nothing: if any section fails or has to wait, the
/// fragments produced so far are discarded and no partial token is returned.
///
/// # Example
///
/// ```
/// use forum_id::{Generator, MonotonicClock, ThreadRandom, TokenGenerator};
/// use std::time::Duration;
///
/// let tokens = TokenGenerator::builder(MonotonicClock::default(), ThreadRandom)
///     .timestamp(8, Duration::from_millis(1))?
///     .counter(2, Duration::from_millis(1))?
///     .random(21)?
///     .build()?;
///
/// let token = tokens.next()?;
/// assert_eq!(token.len(), 31);
/// # Ok::<(), forum_id::Error>(())
/// ```
pub struct TokenGenerator {
    sections: Vec<Box<dyn Section>>,
    width: usize,
}

impl TokenGenerator {
    /// Creates a generator from already constructed sections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] if `sections` is empty.
    pub fn new(sections: Vec<Box<dyn Section>>) -> Result<Self> {
        if sections.is_empty() {
            return Err(Error::InvalidLayout {
                reason: "a token needs at least one section",
            });
        }
        let width = sections.iter().map(|s| s.width()).sum();
        Ok(Self { sections, width })
    }

    /// Starts a builder whose sections share `time` and `rng`.
    pub fn builder<T, R>(time: T, rng: R) -> TokenBuilder<T, R> {
        TokenBuilder {
            time,
            rng,
            sections: Vec::new(),
        }
    }

    /// Session token: timestamp(8, 1 ms), counter(2, 1 ms), random(21).
    ///
    /// Tokens minted by one generator sort by creation time on their first
    /// ten symbols; the remaining 126 bits are random.
    ///
    /// # Errors
    ///
    /// Never fails for a valid clock; the section widths are fixed.
    pub fn session<T>(time: T) -> Result<Self>
    where
        T: TimeSource + Clone + Send + Sync + 'static,
    {
        let unit = Duration::from_millis(1);
        Self::builder(time, ThreadRandom)
            .timestamp(8, unit)?
            .counter(2, unit)?
            .random(21)?
            .build()
    }

    /// One-time sign-in code: 8 random symbols (48 bits).
    ///
    /// # Errors
    ///
    /// Never fails; the section width is fixed.
    pub fn sign_in_code() -> Result<Self> {
        let code: Box<dyn Section> = Box::new(RandomSection::new(8, ThreadRandom)?);
        Self::new(alloc::vec![code])
    }

    /// Anonymous per-thread handle: 6 random symbols (36 bits).
    ///
    /// # Errors
    ///
    /// Never fails; the section width is fixed.
    pub fn anonymous_handle() -> Result<Self> {
        let handle: Box<dyn Section> = Box::new(RandomSection::new(6, ThreadRandom)?);
        Self::new(alloc::vec![handle])
    }

    /// Length, in symbols, of every token.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Kind and width of each section, in order.
    pub fn sections(&self) -> impl Iterator<Item = (SectionKind, usize)> + '_ {
        self.sections.iter().map(|s| (s.kind(), s.width()))
    }
}

impl fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGenerator")
            .field("sections", &self.sections().collect::<Vec<_>>())
            .field("width", &self.width)
            .finish()
    }
}

impl Generator for TokenGenerator {
    type Output = String;

    /// Asks every section for its fragment.
    ///
    /// A counter section reserved before a later section reports `Pending`
    /// loses its value for that window; this only matters for generators
    /// with more than one counter section.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn poll_next(&self) -> Result<Poll<String>> {
        let mut token = String::with_capacity(self.width);
        for section in &self.sections {
            if let Poll::Pending { yield_for } = section.poll_produce(&mut token)? {
                return Ok(Poll::Pending { yield_for });
            }
        }
        debug_assert_eq!(token.len(), self.width);
        Ok(Poll::Ready { value: token })
    }
}

/// Assembles a [`TokenGenerator`] section by section.
///
/// Timestamp and counter sections get a clone of the builder's clock; random
/// sections get a clone of its random source.
#[derive(Debug)]
pub struct TokenBuilder<T, R> {
    time: T,
    rng: R,
    sections: Vec<Box<dyn Section>>,
}

impl<T, R> TokenBuilder<T, R>
where
    T: TimeSource + Clone + Send + Sync + 'static,
    R: RandSource + Clone + Send + Sync + 'static,
{
    /// Appends a [`TimestampSection`].
    ///
    /// # Errors
    ///
    /// See [`TimestampSection::new`].
    pub fn timestamp(mut self, width: usize, unit: Duration) -> Result<Self> {
        let section = TimestampSection::new(width, unit, self.time.clone())?;
        self.sections.push(Box::new(section));
        Ok(self)
    }

    /// Appends a [`CounterSection`].
    ///
    /// # Errors
    ///
    /// See [`CounterSection::new`].
    pub fn counter(mut self, width: usize, unit: Duration) -> Result<Self> {
        let section = CounterSection::new(width, unit, self.time.clone())?;
        self.sections.push(Box::new(section));
        Ok(self)
    }

    /// Appends a [`RandomSection`].
    ///
    /// # Errors
    ///
    /// See [`RandomSection::new`].
    pub fn random(mut self, width: usize) -> Result<Self> {
        let section = RandomSection::new(width, self.rng.clone())?;
        self.sections.push(Box::new(section));
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] if no section was added.
    pub fn build(self) -> Result<TokenGenerator> {
        TokenGenerator::new(self.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MonotonicClock, codec};
    use std::{
        collections::HashSet,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
    };

    #[derive(Clone, Debug)]
    struct StepTime(Arc<AtomicU64>);

    impl StepTime {
        fn at(millis: u64) -> Self {
            Self(Arc::new(AtomicU64::new(millis)))
        }

        fn advance(&self, millis: u64) {
            self.0.fetch_add(millis, Ordering::Relaxed);
        }
    }

    impl TimeSource for StepTime {
        fn current_millis(&self) -> u64 {
            self.0.load(Ordering::Relaxed)
        }
    }

    #[derive(Clone, Debug)]
    struct FixedRand(u128);

    impl RandSource for FixedRand {
        fn rand(&self) -> u128 {
            self.0
        }
    }

    fn in_alphabet(token: &str) -> bool {
        token.bytes().all(|b| codec::ALPHABET.contains(&b))
    }

    #[test]
    fn presets_have_fixed_widths() {
        let session = TokenGenerator::session(MonotonicClock::default()).unwrap();
        assert_eq!(session.width(), 31);
        assert_eq!(
            session.sections().collect::<Vec<_>>(),
            [
                (SectionKind::Timestamp, 8),
                (SectionKind::Counter, 2),
                (SectionKind::Random, 21)
            ]
        );
        let token = session.next().unwrap();
        assert_eq!(token.len(), 31);
        assert!(in_alphabet(&token));

        let code = TokenGenerator::sign_in_code().unwrap().next().unwrap();
        assert_eq!(code.len(), 8);
        assert!(in_alphabet(&code));

        let handle = TokenGenerator::anonymous_handle().unwrap().next().unwrap();
        assert_eq!(handle.len(), 6);
    }

    #[test]
    fn sections_are_concatenated_in_order() {
        let tokens = TokenGenerator::builder(StepTime::at(65), FixedRand(u128::MAX))
            .timestamp(2, Duration::from_millis(1))
            .unwrap()
            .counter(1, Duration::from_millis(1))
            .unwrap()
            .random(3)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(tokens.next().unwrap(), "00-zzz");
        assert_eq!(tokens.next().unwrap(), "000zzz");
    }

    #[test]
    fn session_tokens_sort_by_creation_prefix() {
        let session = TokenGenerator::session(MonotonicClock::default()).unwrap();
        let mut last = session.next().unwrap();
        for _ in 0..2_000 {
            let token = session.next().unwrap();
            assert!(token[..10] > last[..10], "{token} !> {last}");
            last = token;
        }
    }

    #[test]
    fn exhausted_counter_blocks_until_next_window() {
        let time = StepTime::at(500);
        let tokens = TokenGenerator::builder(time.clone(), FixedRand(0))
            .counter(1, Duration::from_millis(1))
            .unwrap()
            .build()
            .unwrap();

        let mut seen = HashSet::new();
        for _ in 0..64 {
            assert!(seen.insert(tokens.poll_next().unwrap().unwrap_ready()));
        }
        assert_eq!(tokens.poll_next().unwrap(), Poll::Pending { yield_for: 1 });

        let mut waits = 0;
        let token = tokens
            .try_next_with(|yield_for| {
                waits += 1;
                time.advance(yield_for);
                Ok(())
            })
            .unwrap();
        assert_eq!(waits, 1);
        assert_eq!(token, "-");
    }

    #[test]
    fn failing_section_aborts_whole_token() {
        let tokens = TokenGenerator::builder(StepTime::at(64), FixedRand(0))
            .random(4)
            .unwrap()
            .timestamp(1, Duration::from_millis(1))
            .unwrap()
            .build()
            .unwrap();

        let err = tokens.next().unwrap_err();
        assert_eq!(err, Error::OutOfRange { value: 64, width: 1 });
        assert!(err.is_out_of_range());
    }

    #[test]
    fn builder_rejects_bad_sections() {
        let builder = TokenGenerator::builder(StepTime::at(0), FixedRand(0));
        assert!(builder.build().is_err());

        assert!(
            TokenGenerator::builder(StepTime::at(0), FixedRand(0))
                .counter(11, Duration::from_millis(1))
                .is_err()
        );
        assert_eq!(
            TokenGenerator::builder(StepTime::at(0), FixedRand(0))
                .timestamp(4, Duration::from_micros(1))
                .unwrap_err(),
            Error::InvalidUnit
        );
    }

    #[test]
    fn random_tokens_are_unique() {
        let codes = TokenGenerator::sign_in_code().unwrap();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(codes.next().unwrap()));
        }
    }

    trait PollExt<T> {
        fn unwrap_ready(self) -> T;
    }

    impl<T> PollExt<T> for Poll<T> {
        fn unwrap_ready(self) -> T {
            match self {
                Poll::Ready { value } => value,
                Poll::Pending { yield_for } => panic!("unexpected pending ({yield_for})"),
            }
        }
    }
}
