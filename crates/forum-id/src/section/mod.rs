mod counter;
mod interface;
mod random;
mod timestamp;

pub use counter::*;
pub use interface::*;
pub use random::*;
pub use timestamp::*;
