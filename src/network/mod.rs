pub mod change;
pub mod topology;

pub use change::*;
pub use topology::*;
