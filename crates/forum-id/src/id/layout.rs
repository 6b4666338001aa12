use crate::{Error, Identifier, Result};

/// Bit layout of a 64-bit [`Identifier`].
///
/// From most to least significant bit an identifier carries a timestamp
/// tick, a per-tick counter, and optional random bits:
///
/// ```text
///  Bit Index:  63                                                    0
///              +-------------------+-----------------+---------------+
///  Field:      | timestamp (41)    | counter (12)    | random (10)   |
///              +-------------------+-----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB -------->|
/// ```
///
/// The default layout leaves the top bit clear, which keeps identifiers
/// positive when stored in signed 64-bit database columns. With a 1 ms unit
/// its 41 timestamp bits last about 69 years past the epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    timestamp_bits: u32,
    counter_bits: u32,
    random_bits: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

impl Layout {
    /// 41 timestamp bits, 12 counter bits, 10 random bits.
    pub const DEFAULT: Self = Self {
        timestamp_bits: 41,
        counter_bits: 12,
        random_bits: 10,
    };

    /// Creates a layout from its three field widths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] if the timestamp or counter field is
    /// empty, or the fields together need more than 64 bits.
    pub const fn new(timestamp_bits: u32, counter_bits: u32, random_bits: u32) -> Result<Self> {
        if timestamp_bits == 0 {
            return Err(Error::InvalidLayout {
                reason: "timestamp field must have at least one bit",
            });
        }
        if counter_bits == 0 {
            return Err(Error::InvalidLayout {
                reason: "counter field must have at least one bit",
            });
        }
        if timestamp_bits as u64 + counter_bits as u64 + random_bits as u64 > u64::BITS as u64 {
            return Err(Error::InvalidLayout {
                reason: "fields exceed 64 bits",
            });
        }
        Ok(Self {
            timestamp_bits,
            counter_bits,
            random_bits,
        })
    }

    pub const fn timestamp_bits(&self) -> u32 {
        self.timestamp_bits
    }

    pub const fn counter_bits(&self) -> u32 {
        self.counter_bits
    }

    pub const fn random_bits(&self) -> u32 {
        self.random_bits
    }

    /// Total bits used by the three fields.
    pub const fn total_bits(&self) -> u32 {
        self.timestamp_bits + self.counter_bits + self.random_bits
    }

    /// Largest timestamp tick the layout can hold.
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    /// Largest counter value the layout can hold.
    pub const fn max_counter(&self) -> u64 {
        mask(self.counter_bits)
    }

    /// Mask applied to the random field (zero when the field is empty).
    pub const fn max_random(&self) -> u64 {
        mask(self.random_bits)
    }

    const fn timestamp_shift(&self) -> u32 {
        self.counter_bits + self.random_bits
    }

    const fn counter_shift(&self) -> u32 {
        self.random_bits
    }

    /// Packs the three fields into an identifier. Each field is masked to its
    /// width.
    pub const fn pack(&self, timestamp: u64, counter: u64, random: u64) -> Identifier {
        let timestamp = (timestamp & self.max_timestamp()) << self.timestamp_shift();
        let counter = (counter & self.max_counter()) << self.counter_shift();
        let random = random & self.max_random();
        Identifier::from_raw(timestamp | counter | random)
    }

    /// Extracts the timestamp tick.
    pub const fn timestamp(&self, id: Identifier) -> u64 {
        (id.to_raw() >> self.timestamp_shift()) & self.max_timestamp()
    }

    /// Extracts the counter value.
    pub const fn counter(&self, id: Identifier) -> u64 {
        (id.to_raw() >> self.counter_shift()) & self.max_counter()
    }

    /// Extracts the random bits.
    pub const fn random(&self, id: Identifier) -> u64 {
        id.to_raw() & self.max_random()
    }
}
