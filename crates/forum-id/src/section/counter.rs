use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Poll, Result, Section, SectionKind, TimeSource, WindowCounter,
    codec::{self, check_width},
};

/// Widest counter section: `64^10 = 2^60` values still fit a `u64`.
pub const MAX_COUNTER_WIDTH: usize = 10;

/// Encodes a per-window counter at a fixed width.
///
/// Within one `unit` window the section produces `0, 1, 2, ...` up to
/// `64^width - 1`, then reports [`Poll::Pending`] until the next window
/// opens. Only the reservation is done under the counter's lock; the value
/// is encoded after the lock is released.
#[derive(Debug)]
pub struct CounterSection<T: TimeSource> {
    width: usize,
    counter: WindowCounter,
    time: T,
}

impl<T: TimeSource> CounterSection<T> {
    /// # Errors
    ///
    /// - [`Error::InvalidWidth`] unless `1 <= width <= 10`.
    /// - [`Error::InvalidUnit`] if `unit` is under one millisecond.
    ///
    /// [`Error::InvalidWidth`]: crate::Error::InvalidWidth
    /// [`Error::InvalidUnit`]: crate::Error::InvalidUnit
    pub fn new(width: usize, unit: Duration, time: T) -> Result<Self> {
        check_width(width, MAX_COUNTER_WIDTH)?;
        // width <= 10 so the capacity is at most 2^60
        let capacity = codec::capacity(width) as u64;
        Ok(Self {
            width,
            counter: WindowCounter::new(capacity, unit)?,
            time,
        })
    }

    /// The underlying window counter.
    pub const fn counter(&self) -> &WindowCounter {
        &self.counter
    }
}

impl<T> Section for CounterSection<T>
where
    T: TimeSource + Send + Sync,
{
    fn kind(&self) -> SectionKind {
        SectionKind::Counter
    }

    fn width(&self) -> usize {
        self.width
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, out)))]
    fn poll_produce(&self, out: &mut String) -> Result<Poll<()>> {
        match self.counter.try_reserve(self.time.current_millis())? {
            Poll::Ready { value } => {
                codec::encode_into(u128::from(value.value), self.width, out)?;
                Ok(Poll::Ready { value: () })
            }
            Poll::Pending { yield_for } => Ok(Poll::Pending { yield_for }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    #[derive(Clone, Debug)]
    struct StepTime(Arc<AtomicU64>);

    impl TimeSource for StepTime {
        fn current_millis(&self) -> u64 {
            self.0.load(Ordering::Relaxed)
        }
    }

    #[test]
    fn one_symbol_counter_rolls_over_per_window() {
        let time = StepTime(Arc::new(AtomicU64::new(100)));
        let section = CounterSection::new(1, Duration::from_millis(1), time.clone()).unwrap();

        let mut seen = Vec::new();
        for _ in 0..64 {
            let mut out = String::new();
            assert!(section.poll_produce(&mut out).unwrap().is_ready());
            seen.push(out);
        }
        let expected: Vec<String> = codec::ALPHABET.iter().map(|&b| char::from(b).to_string()).collect();
        assert_eq!(seen, expected);

        let mut out = String::new();
        assert_eq!(
            section.poll_produce(&mut out).unwrap(),
            Poll::Pending { yield_for: 1 }
        );
        assert!(out.is_empty());

        time.0.store(101, Ordering::Relaxed);
        section.poll_produce(&mut out).unwrap();
        assert_eq!(out, "-");
        assert_eq!(section.counter().snapshot().unwrap().current_window, 101);
    }

    #[test]
    fn rejects_widths_beyond_u64() {
        let time = StepTime(Arc::new(AtomicU64::new(0)));
        assert_eq!(
            CounterSection::new(11, Duration::from_millis(1), time.clone()).unwrap_err(),
            Error::InvalidWidth {
                width: 11,
                max: MAX_COUNTER_WIDTH
            }
        );
        let widest = CounterSection::new(10, Duration::from_millis(1), time).unwrap();
        assert_eq!(widest.counter().capacity(), 1 << 60);
    }
}
