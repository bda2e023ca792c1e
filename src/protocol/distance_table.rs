use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::RouterId;
use super::Cost;

/// Per-router cost matrix indexed by destination, then by the neighbor used
/// as first hop. The owner never appears as a destination or a via.
///
/// The diagonal `[n][n]` holds the owner's direct-link cost to `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceTable {
    owner: RouterId,
    rows: BTreeMap<RouterId, BTreeMap<RouterId, Cost>>,
}

impl DistanceTable {
    /// Builds an all-infinite table over `nodes`, skipping the owner.
    pub fn new<'a, I>(owner: &str, nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a RouterId>,
    {
        let mut table = Self {
            owner: owner.to_string(),
            rows: BTreeMap::new(),
        };
        for node in nodes {
            table.add_node(node);
        }
        table
    }

    /// Adds an all-infinite row and column for `node`. Returns `false` if the
    /// node is already present or is the owner.
    pub fn add_node(&mut self, node: &str) -> bool {
        if node == self.owner || self.rows.contains_key(node) {
            return false;
        }

        for row in self.rows.values_mut() {
            row.insert(node.to_string(), Cost::Infinite);
        }
        let row = self
            .rows
            .keys()
            .cloned()
            .chain(std::iter::once(node.to_string()))
            .map(|via| (via, Cost::Infinite))
            .collect();
        self.rows.insert(node.to_string(), row);
        true
    }

    pub fn contains(&self, node: &str) -> bool {
        self.rows.contains_key(node)
    }

    /// Destination names in lexicographic order.
    pub fn destinations(&self) -> impl Iterator<Item = &RouterId> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cost to `dest` via `via`; infinite for anything not in the table.
    pub fn get(&self, dest: &str, via: &str) -> Cost {
        self.rows
            .get(dest)
            .and_then(|row| row.get(via))
            .copied()
            .unwrap_or(Cost::Infinite)
    }

    pub fn diagonal(&self, node: &str) -> Cost {
        self.get(node, node)
    }

    /// Writes one cell. Returns `true` only if the stored value changed;
    /// unknown coordinates are left alone.
    pub fn set(&mut self, dest: &str, via: &str, cost: Cost) -> bool {
        match self.rows.get_mut(dest).and_then(|row| row.get_mut(via)) {
            Some(cell) if *cell != cost => {
                *cell = cost;
                true
            }
            _ => false,
        }
    }

    /// Marks `via` unusable for every destination. Returns `true` on any change.
    pub fn purge_via(&mut self, via: &str) -> bool {
        let mut changed = false;
        for row in self.rows.values_mut() {
            if let Some(cell) = row.get_mut(via) {
                if *cell != Cost::Infinite {
                    *cell = Cost::Infinite;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Row for `dest` as via → cost, vias in lexicographic order.
    pub fn row(&self, dest: &str) -> Option<&BTreeMap<RouterId, Cost>> {
        self.rows.get(dest)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&RouterId, &BTreeMap<RouterId, Cost>)> {
        self.rows.iter()
    }

    /// Cheapest cost to `dest` and the first via reaching it in lexicographic
    /// order. The via is `None` when `dest` is unreachable or unknown.
    pub fn min_cost(&self, dest: &str) -> (Cost, Option<&RouterId>) {
        let mut best = (Cost::Infinite, None);
        if let Some(row) = self.rows.get(dest) {
            for (via, cost) in row {
                if *cost < best.0 {
                    best = (*cost, Some(via));
                }
            }
        }
        best
    }
}
