use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::RouterId;
use super::{Cost, DistanceTable};

/// Forwarding table derived from a [`DistanceTable`]. Never mutated on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    entries: BTreeMap<RouterId, RoutingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    pub destination: RouterId,
    /// `None` when the destination is unreachable.
    pub next_hop: Option<RouterId>,
    pub cost: Cost,
}

impl RoutingEntry {
    pub fn is_reachable(&self) -> bool {
        self.next_hop.is_some()
    }
}

impl RoutingTable {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn derive(table: &DistanceTable) -> Self {
        let entries = table
            .destinations()
            .map(|dest| {
                let (cost, via) = table.min_cost(dest);
                let entry = RoutingEntry {
                    destination: dest.clone(),
                    next_hop: via.cloned(),
                    cost,
                };
                (dest.clone(), entry)
            })
            .collect();

        Self { entries }
    }

    pub fn get_route(&self, destination: &str) -> Option<&RoutingEntry> {
        self.entries.get(destination)
    }

    /// Cost to `destination`, infinite if there is no entry.
    pub fn cost_to(&self, destination: &str) -> Cost {
        self.entries
            .get(destination)
            .map_or(Cost::Infinite, |entry| entry.cost)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in destination order.
    pub fn iter(&self) -> impl Iterator<Item = &RoutingEntry> {
        self.entries.values()
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}
