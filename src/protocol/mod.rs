pub mod cost;
pub mod distance_table;
pub mod messages;
pub mod routing_table;

pub use cost::*;
pub use distance_table::*;
pub use messages::*;
pub use routing_table::*;
