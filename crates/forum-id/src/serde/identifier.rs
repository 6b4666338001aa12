use core::fmt;

use ::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Identifier;

/// Identifiers serialize as their cursor string, the form clients see.
impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut buf = [0_u8; Identifier::ENCODED_LEN];
        self.encode_to_buf(&mut buf);
        let cursor = core::str::from_utf8(&buf).map_err(::serde::ser::Error::custom)?;
        s.serialize_str(cursor)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct CursorVisitor;

        impl de::Visitor<'_> for CursorVisitor {
            type Value = Identifier;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("an 11-symbol identifier cursor")
            }

            #[inline]
            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Identifier::parse(v).map_err(E::custom)
            }
        }

        d.deserialize_str(CursorVisitor)
    }
}

/// Serializes an [`Identifier`] as its raw integer, for storage formats that
/// keep the numeric column.
///
/// ```
/// use forum_id::{Identifier, as_native};
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Row {
///     #[serde(with = "as_native")]
///     id: Identifier,
/// }
///
/// let json = serde_json::to_string(&Row { id: Identifier::from_raw(42) }).unwrap();
/// assert_eq!(json, r#"{"id":42}"#);
/// ```
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::Identifier;

    /// Serialize an identifier as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(id: &Identifier, s: S) -> Result<S::Ok, S::Error> {
        id.to_raw().serialize(s)
    }

    /// Deserialize an identifier from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Identifier, D::Error> {
        u64::deserialize(d).map(Identifier::from_raw)
    }
}
