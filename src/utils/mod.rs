//! Project-specific utilities live here.

pub mod clock;
pub mod id;

pub use clock::{Clock, SystemClock};
pub use id::{IdGenerator, RandomIdGenerator};
