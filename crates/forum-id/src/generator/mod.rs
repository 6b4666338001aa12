mod counter;
mod identifier;
mod interface;
mod mutex;
mod status;

pub use counter::*;
pub use identifier::*;
pub use interface::*;
pub use mutex::*;
pub use status::*;
