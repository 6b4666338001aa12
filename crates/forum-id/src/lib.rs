//! Time-ordered identifiers, opaque tokens, and cursor pagination for the
//! forum backend.
//!
//! Everything is built on one order-preserving base-64 [`codec`]: an
//! [`Identifier`] packs `timestamp | counter | random` into a `u64` and
//! encodes it as an 11-symbol cursor whose string order matches its numeric
//! order, a [`TokenGenerator`] concatenates encoded [`Section`]s into opaque
//! strings, and a [`CursorWindow`] pages through storage by those cursors.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod codec;
mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod id;
mod rand;
mod section;
#[cfg(feature = "serde")]
mod serde;
mod time;
mod token;
mod window;

pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
pub use crate::section::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
pub use crate::token::*;
pub use crate::window::*;
