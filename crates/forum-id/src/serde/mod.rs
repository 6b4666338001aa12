mod identifier;

pub use identifier::*;
