use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::RouterId;

static NO_NEIGHBORS: BTreeMap<RouterId, u64> = BTreeMap::new();

/// Undirected weighted graph over router names.
///
/// Every edge is stored in both directions, so `cost(a, b) == cost(b, a)` holds
/// after any sequence of insertions and removals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    adjacency: BTreeMap<RouterId, BTreeMap<RouterId, u64>>,
}

impl Topology {
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
        }
    }

    /// Registers an isolated vertex. Returns `true` if the node was not known.
    pub fn add_node(&mut self, node: &str) -> bool {
        if self.adjacency.contains_key(node) {
            return false;
        }
        self.adjacency.insert(node.to_string(), BTreeMap::new());
        true
    }

    /// Sets the cost of the edge in both directions, creating vertices as needed.
    /// Self-loops are ignored. Returns `true` if the stored cost changed.
    pub fn add_or_update_edge(&mut self, a: &str, b: &str, weight: u64) -> bool {
        if a == b {
            return false;
        }
        let previous = self.cost_between(a, b);

        for (from, to) in [(a, b), (b, a)] {
            self.adjacency
                .entry(from.to_string())
                .or_default()
                .insert(to.to_string(), weight);
        }

        previous != Some(weight)
    }

    /// Deletes both directions of the edge. No-op if it does not exist.
    pub fn remove_edge(&mut self, a: &str, b: &str) -> bool {
        let mut removed = false;
        for (from, to) in [(a, b), (b, a)] {
            if let Some(links) = self.adjacency.get_mut(from) {
                removed |= links.remove(to).is_some();
            }
        }
        removed
    }

    /// Neighbor → cost map; empty for unknown or isolated nodes.
    pub fn neighbors_of(&self, node: &str) -> &BTreeMap<RouterId, u64> {
        self.adjacency.get(node).unwrap_or(&NO_NEIGHBORS)
    }

    pub fn cost_between(&self, a: &str, b: &str) -> Option<u64> {
        self.adjacency.get(a).and_then(|links| links.get(b)).copied()
    }

    pub fn is_neighbor(&self, a: &str, b: &str) -> bool {
        self.cost_between(a, b).is_some()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// All known vertices in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &RouterId> {
        self.adjacency.keys()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|links| links.len()).sum::<usize>() / 2
    }

    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(from, links)| {
            links
                .iter()
                .all(|(to, weight)| self.cost_between(to, from) == Some(*weight))
        })
    }
}
