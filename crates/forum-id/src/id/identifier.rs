use core::{fmt, str::FromStr};

use crate::{Error, Layout, Result, codec};

/// A 64-bit, time-ordered identifier for threads, posts, and other records.
///
/// An identifier is an opaque integer to the database and an 11-symbol
/// cursor string to clients. Both forms order the same way: for any two
/// identifiers `a < b` if and only if `a.to_string() < b.to_string()`, so a
/// cursor can be compared, sorted, or used as a range bound without decoding.
///
/// Field accessors use [`Layout::DEFAULT`]; identifiers minted with a custom
/// layout should be inspected through [`Layout`] instead.
///
/// # Example
///
/// ```
/// use forum_id::Identifier;
///
/// let id = Identifier::from_raw(42);
/// let cursor = id.to_string();
/// assert_eq!(cursor.len(), Identifier::ENCODED_LEN);
/// assert_eq!(cursor.parse::<Identifier>().unwrap(), id);
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    id: u64,
}

impl Identifier {
    /// The zero identifier, used as the "no value" marker.
    pub const UNSET: Self = Self { id: 0 };

    /// Number of symbols in an encoded identifier.
    pub const ENCODED_LEN: usize = codec::width_for_bits(u64::BITS as usize);

    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns `true` for [`Identifier::UNSET`].
    pub const fn is_unset(&self) -> bool {
        self.id == 0
    }

    /// Timestamp tick under [`Layout::DEFAULT`].
    pub const fn timestamp(&self) -> u64 {
        Layout::DEFAULT.timestamp(*self)
    }

    /// Counter value under [`Layout::DEFAULT`].
    pub const fn counter(&self) -> u64 {
        Layout::DEFAULT.counter(*self)
    }

    /// Random bits under [`Layout::DEFAULT`].
    pub const fn random(&self) -> u64 {
        Layout::DEFAULT.random(*self)
    }

    /// Writes the cursor form into a caller-provided buffer without
    /// allocating.
    pub fn encode_to_buf(&self, buf: &mut [u8; Self::ENCODED_LEN]) {
        let encoded = codec::encode_to_slice(u128::from(self.id), buf);
        debug_assert!(encoded.is_ok(), "11 symbols hold 66 bits, so any u64 fits");
    }

    /// Returns the cursor form as a `String`.
    pub fn encode(&self) -> String {
        let mut buf = [0_u8; Self::ENCODED_LEN];
        self.encode_to_buf(&mut buf);
        buf.iter().map(|&b| char::from(b)).collect()
    }

    /// Parses an identifier from its cursor form.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] unless `cursor` is exactly
    ///   [`Identifier::ENCODED_LEN`] bytes.
    /// - [`Error::InvalidSymbol`] for bytes outside the alphabet.
    /// - [`Error::OutOfRange`] if the decoded value does not fit 64 bits.
    pub fn parse(cursor: &str) -> Result<Self> {
        if cursor.len() != Self::ENCODED_LEN {
            return Err(Error::InvalidLength {
                expected: Self::ENCODED_LEN,
                len: cursor.len(),
            });
        }
        let value = codec::decode(cursor)?;
        let id = u64::try_from(value).map_err(|_| Error::OutOfRange {
            value,
            width: Self::ENCODED_LEN,
        })?;
        Ok(Self { id })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0_u8; Self::ENCODED_LEN];
        self.encode_to_buf(&mut buf);
        let s = core::str::from_utf8(&buf).map_err(|_| fmt::Error)?;
        f.write_str(s)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identifier")
            .field("id", &self.id)
            .field("cursor", &format_args!("{self}"))
            .field("timestamp", &self.timestamp())
            .field("counter", &self.counter())
            .field("random", &self.random())
            .finish()
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<u64> for Identifier {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Identifier> for u64 {
    fn from(id: Identifier) -> Self {
        id.to_raw()
    }
}
