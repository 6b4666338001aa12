//! Cursor-based windowed pagination over time-ordered identifiers.
//!
//! Pages are always returned newest first. A client walks toward older
//! entries with `after` and toward newer ones with `before`, passing the
//! `last_cursor` or `first_cursor` of the page it holds.

mod error;
mod executor;
mod info;
mod memory;
mod query;
mod source;

pub use error::*;
pub use executor::*;
pub use info::*;
pub use memory::*;
pub use query::*;
pub use source::*;
