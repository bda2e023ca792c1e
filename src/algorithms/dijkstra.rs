use std::collections::{BTreeMap, BinaryHeap};
use std::cmp::Ordering;
use serde::Serialize;
use crate::RouterId;
use crate::network::Topology;
use crate::protocol::Cost;
use super::RouterRegistry;

#[derive(Debug, PartialEq, Eq)]
struct State {
    cost: u64,
    router: RouterId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.router.cmp(&self.router))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cost of the shortest path from `source` to every other vertex of
/// `topology`. Unreachable vertices map to [`Cost::Infinite`]; the source
/// itself is left out.
pub fn shortest_costs(topology: &Topology, source: &str) -> BTreeMap<RouterId, Cost> {
    let mut distances: BTreeMap<RouterId, u64> = BTreeMap::new();
    let mut heap = BinaryHeap::new();

    if topology.contains(source) {
        distances.insert(source.to_string(), 0);
        heap.push(State {
            cost: 0,
            router: source.to_string(),
        });
    }

    while let Some(State { cost, router }) = heap.pop() {
        // Skip if we've already found a better path
        if distances.get(&router).is_some_and(|best| cost > *best) {
            continue;
        }

        for (neighbor, link_cost) in topology.neighbors_of(&router) {
            let Some(new_cost) = cost.checked_add(*link_cost) else {
                continue;
            };
            if distances.get(neighbor).is_none_or(|best| new_cost < *best) {
                distances.insert(neighbor.clone(), new_cost);
                heap.push(State {
                    cost: new_cost,
                    router: neighbor.clone(),
                });
            }
        }
    }

    topology
        .nodes()
        .filter(|node| node.as_str() != source)
        .map(|node| {
            let cost = distances.get(node).map_or(Cost::Infinite, |c| Cost::Finite(*c));
            (node.clone(), cost)
        })
        .collect()
}

/// A routing-table cost that disagrees with the shortest path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMismatch {
    pub router: RouterId,
    pub destination: RouterId,
    pub advertised: Cost,
    pub shortest: Cost,
}

/// Compares every router's derived routing costs with Dijkstra on `topology`.
pub fn verify_routes(topology: &Topology, registry: &RouterRegistry) -> Vec<RouteMismatch> {
    let mut mismatches = Vec::new();

    for router in registry.iter() {
        let expected = shortest_costs(topology, router.name());
        let routes = router.routing_table();
        for entry in routes.iter() {
            let shortest = expected.get(&entry.destination).copied().unwrap_or(Cost::Infinite);
            if entry.cost != shortest {
                mismatches.push(RouteMismatch {
                    router: router.name().clone(),
                    destination: entry.destination.clone(),
                    advertised: entry.cost,
                    shortest,
                });
            }
        }
    }

    mismatches
}
