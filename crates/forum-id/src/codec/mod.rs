//! Order-preserving base-64 codec.
//!
//! Values are written big-endian, six bits per symbol, left-padded with the
//! zero symbol to a fixed width. The alphabet is laid out in ASCII order so a
//! plain byte-wise comparison of two encodings of the same width agrees with
//! the numeric comparison of the values they carry.

use crate::{Error, Result};

/// The 64 symbols in significance order (`-`, `0-9`, `A-Z`, `_`, `a-z`).
pub const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// The symbol that encodes a zero digit and pads narrow values.
pub const ZERO_SYMBOL: char = '-';

/// Number of bits carried by one symbol.
pub const BITS_PER_SYMBOL: usize = 6;

/// Widest encoding supported (`21 * 6 = 126` bits fit a `u128`).
pub const MAX_WIDTH: usize = 21;

const NO_VALUE: u8 = 255;
const MASK: u128 = 0x3F;

/// Lookup table from byte to digit value.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

/// Returns `64^width`, the number of distinct values a `width`-symbol
/// encoding can hold.
///
/// # Panics
///
/// Panics in const contexts if `width > MAX_WIDTH`; callers validate widths
/// with [`check_width`] first.
pub const fn capacity(width: usize) -> u128 {
    assert!(width <= MAX_WIDTH, "width exceeds MAX_WIDTH");
    1_u128 << (width * BITS_PER_SYMBOL)
}

/// Validates that `width` lies in `1..=max`.
///
/// # Errors
///
/// Returns [`Error::InvalidWidth`] otherwise.
pub const fn check_width(width: usize, max: usize) -> Result<()> {
    if width == 0 || width > max {
        return Err(Error::InvalidWidth { width, max });
    }
    Ok(())
}

/// Encodes `value` as exactly `width` symbols.
///
/// # Errors
///
/// - [`Error::InvalidWidth`] if `width` is zero or wider than [`MAX_WIDTH`].
/// - [`Error::OutOfRange`] if `value >= 64^width`.
///
/// # Example
///
/// ```
/// use forum_id::codec;
///
/// assert_eq!(codec::encode(0, 3).unwrap(), "---");
/// assert_eq!(codec::encode(63, 1).unwrap(), "z");
/// assert!(codec::encode(64, 1).is_err());
/// ```
pub fn encode(value: u128, width: usize) -> Result<String> {
    let mut out = String::with_capacity(width);
    encode_into(value, width, &mut out)?;
    Ok(out)
}

/// Appends the `width`-symbol encoding of `value` to `out`.
///
/// Nothing is appended when an error is returned.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_into(value: u128, width: usize, out: &mut String) -> Result<()> {
    check_width(width, MAX_WIDTH)?;
    if value >= capacity(width) {
        return Err(Error::OutOfRange { value, width });
    }

    out.reserve(width);
    for shift in (0..width).rev() {
        out.push(char::from(digit_at(value, shift)));
    }
    Ok(())
}

/// Writes the encoding of `value` into `buf`, using `buf.len()` as the width.
///
/// This is the zero-allocation alternative to [`encode`]; `buf` is left
/// untouched on error.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_to_slice(value: u128, buf: &mut [u8]) -> Result<()> {
    let width = buf.len();
    check_width(width, MAX_WIDTH)?;
    if value >= capacity(width) {
        return Err(Error::OutOfRange { value, width });
    }

    for (i, slot) in buf.iter_mut().enumerate() {
        *slot = digit_at(value, width - 1 - i);
    }
    Ok(())
}

#[inline]
fn digit_at(value: u128, shift: usize) -> u8 {
    let digit = (value >> (shift * BITS_PER_SYMBOL)) & MASK;
    // `digit` is masked to 0..=63
    ALPHABET[digit as usize]
}

/// Decodes a string produced by [`encode`] back into its value.
///
/// Any width up to [`MAX_WIDTH`] is accepted; padding symbols are simply
/// leading zero digits.
///
/// # Errors
///
/// - [`Error::InvalidWidth`] if `encoded` is longer than [`MAX_WIDTH`].
/// - [`Error::InvalidSymbol`] on the first byte outside the alphabet.
pub fn decode(encoded: &str) -> Result<u128> {
    if encoded.len() > MAX_WIDTH {
        return Err(Error::InvalidWidth {
            width: encoded.len(),
            max: MAX_WIDTH,
        });
    }

    let mut acc = 0_u128;
    for (index, byte) in encoded.bytes().enumerate() {
        let val = LOOKUP[byte as usize];
        if val == NO_VALUE {
            return Err(Error::InvalidSymbol { byte, index });
        }
        acc = (acc << BITS_PER_SYMBOL) | u128::from(val);
    }
    Ok(acc)
}

/// Returns the number of symbols needed to hold `bits` bits.
pub const fn width_for_bits(bits: usize) -> usize {
    bits.div_ceil(BITS_PER_SYMBOL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_sorted_and_unique() {
        for pair in ALPHABET.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0] as char, pair[1] as char);
        }
    }

    #[test]
    fn encode_pads_with_zero_symbol() {
        assert_eq!(encode(0, 4).unwrap(), "----");
        assert_eq!(encode(1, 4).unwrap(), "---0");
        assert_eq!(encode(63, 2).unwrap(), "-z");
        assert_eq!(encode(64, 2).unwrap(), "0-");
        assert!(encode(0, 1).unwrap().starts_with(ZERO_SYMBOL));
    }

    #[test]
    fn every_two_symbol_value_roundtrips_in_order() {
        let width = 2;
        let mut prev: Option<String> = None;
        for v in 0..capacity(width) {
            let s = encode(v, width).unwrap();
            assert_eq!(s.len(), width);
            assert_eq!(decode(&s).unwrap(), v, "roundtrip for {v} ({s})");
            if let Some(p) = prev {
                assert!(p < s, "order broken at {v}: {p} !< {s}");
            }
            prev = Some(s);
        }
    }

    #[test]
    fn wide_values_roundtrip() {
        for &v in &[
            0,
            1,
            42,
            u128::from(u64::MAX),
            0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEF,
            capacity(MAX_WIDTH) - 1,
        ] {
            let s = encode(v, MAX_WIDTH).unwrap();
            assert_eq!(decode(&s).unwrap(), v);
        }
    }

    #[test]
    fn order_holds_across_symbol_class_boundaries() {
        // '9' -> 'A', 'Z' -> '_', '_' -> 'a'
        let boundaries = [10_u128, 11, 36, 37, 38];
        for &v in &boundaries {
            let lo = encode(v - 1, 3).unwrap();
            let hi = encode(v, 3).unwrap();
            assert!(lo < hi, "{lo} !< {hi}");
        }
    }

    #[test]
    fn encode_rejects_values_beyond_width() {
        assert_eq!(
            encode(64, 1).unwrap_err(),
            Error::OutOfRange { value: 64, width: 1 }
        );
        assert_eq!(
            encode(capacity(3), 3).unwrap_err(),
            Error::OutOfRange {
                value: capacity(3),
                width: 3
            }
        );
    }

    #[test]
    fn encode_rejects_unsupported_widths() {
        assert_eq!(
            encode(0, 0).unwrap_err(),
            Error::InvalidWidth {
                width: 0,
                max: MAX_WIDTH
            }
        );
        assert!(encode(0, MAX_WIDTH + 1).is_err());
    }

    #[test]
    fn encode_into_leaves_buffer_untouched_on_error() {
        let mut buf = String::from("ab");
        assert!(encode_into(1 << 12, 2, &mut buf).is_err());
        assert_eq!(buf, "ab");
        encode_into(5, 2, &mut buf).unwrap();
        assert_eq!(buf, "ab-4");
    }

    #[test]
    fn encode_to_slice_matches_encode() {
        let mut buf = [0_u8; 11];
        encode_to_slice(0x1234_5678_9ABC_DEF0, &mut buf).unwrap();
        assert_eq!(&buf[..], encode(0x1234_5678_9ABC_DEF0, 11).unwrap().as_bytes());

        let mut narrow = [b'x'; 1];
        assert!(encode_to_slice(64, &mut narrow).is_err());
        assert_eq!(narrow, [b'x']);
    }

    #[test]
    fn decode_returns_error_for_invalid_symbol() {
        assert_eq!(
            decode("abc!e").unwrap_err(),
            Error::InvalidSymbol {
                byte: b'!',
                index: 3
            }
        );
        assert!(decode("AB=").is_err());
        assert!(decode("é").is_err());
    }

    #[test]
    fn decode_rejects_overlong_input() {
        let s = "-".repeat(MAX_WIDTH + 1);
        assert_eq!(
            decode(&s).unwrap_err(),
            Error::InvalidWidth {
                width: MAX_WIDTH + 1,
                max: MAX_WIDTH
            }
        );
    }

    #[test]
    fn width_for_bits_rounds_up() {
        assert_eq!(width_for_bits(64), 11);
        assert_eq!(width_for_bits(63), 11);
        assert_eq!(width_for_bits(60), 10);
        assert_eq!(width_for_bits(1), 1);
    }
}
