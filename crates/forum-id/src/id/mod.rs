mod identifier;
mod layout;

pub use identifier::*;
pub use layout::*;
