pub mod convergence;
pub mod dijkstra;
pub mod registry;
pub mod topology_change;

pub use convergence::{ConvergenceEngine, Phase, RoundOutcome};
pub use dijkstra::{shortest_costs, verify_routes, RouteMismatch};
pub use registry::RouterRegistry;
pub use topology_change::apply_topology_change;
