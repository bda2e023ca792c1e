use log::{debug, info};

use crate::config::ReconvergenceMode;
use crate::network::{apply_batch, BatchSummary, EdgeChange};
use super::ConvergenceEngine;

/// Applies a whole update batch to the engine's topology and routers.
///
/// New names become routers, every router resynchronizes its direct links
/// once, and in [`ReconvergenceMode::Seeded`] each router then pre-relaxes its
/// neighbors' columns from the routing tables they held before the batch.
/// Returns `true` if any router ended up with a changed table.
pub fn apply_topology_change(
    engine: &mut ConvergenceEngine,
    batch: &[EdgeChange],
    mode: ReconvergenceMode,
) -> bool {
    let converged_routes = engine.registry().routing_tables();

    let summary: BatchSummary = apply_batch(engine.topology_mut(), batch);
    info!(
        "Topology batch: {} operations, {} edges changed, {} new routers",
        batch.len(),
        summary.edges_changed,
        summary.new_nodes.len()
    );

    let (topology, registry) = engine.parts_mut();
    for name in &summary.new_nodes {
        registry.insert_node(name);
    }
    for router in registry.iter_mut() {
        router.apply_topology(topology);
    }

    if mode == ReconvergenceMode::Seeded {
        for router in registry.iter_mut() {
            let neighbors = topology.neighbors_of(router.name());
            for neighbor in neighbors.keys() {
                if let Some(routes) = converged_routes.get(neighbor) {
                    router.seed_from_routes(neighbor, routes);
                }
            }
        }
    }

    let dirty = registry.any_dirty();
    debug!("After topology change any router dirty: {}", dirty);
    dirty
}
