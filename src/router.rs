use std::sync::Arc;
use log::debug;

use crate::RouterId;
use crate::network::Topology;
use crate::protocol::{Advertisement, Cost, DistanceTable, RoutingTable};

/// A simulated distance-vector router.
///
/// The dirty flag is raised whenever a cell of the distance table changes and
/// cleared only by [`Router::advertise`].
#[derive(Debug, Clone)]
pub struct Router {
    name: RouterId,
    table: DistanceTable,
    dirty: bool,
}

impl Router {
    pub fn new<'a, I>(name: &str, nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a RouterId>,
    {
        Self {
            name: name.to_string(),
            table: DistanceTable::new(name, nodes),
            dirty: false,
        }
    }

    pub fn name(&self) -> &RouterId {
        &self.name
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Makes room for a router that joined the network. The new cells are
    /// infinite, which is what they implicitly were, so this is not a change.
    pub fn add_node(&mut self, node: &str) -> bool {
        self.table.add_node(node)
    }

    /// Resynchronizes the direct-link costs with `topology`: diagonal entries
    /// follow the current link weights and every via that is no longer a
    /// neighbor is purged.
    pub fn apply_topology(&mut self, topology: &Topology) -> bool {
        let neighbors = topology.neighbors_of(&self.name);
        let mut changed = false;

        for (neighbor, weight) in neighbors {
            if self.table.set(neighbor, neighbor, Cost::Finite(*weight)) {
                debug!("{}: direct cost to {} is now {}", self.name, neighbor, weight);
                changed = true;
            }
        }

        let lost: Vec<RouterId> = self
            .table
            .destinations()
            .filter(|node| !neighbors.contains_key(*node))
            .cloned()
            .collect();
        for node in lost {
            if self.table.purge_via(&node) {
                debug!("{}: link to {} is down, purging its column", self.name, node);
                changed = true;
            }
        }

        self.dirty |= changed;
        changed
    }

    /// Produces one snapshot per neighbor in `topology` if the table has
    /// unadvertised changes, then clears the dirty flag.
    pub fn advertise(&mut self, topology: &Topology) -> Vec<Advertisement> {
        if !self.dirty {
            return Vec::new();
        }
        self.dirty = false;

        let snapshot = Arc::new(self.table.clone());
        topology
            .neighbors_of(&self.name)
            .keys()
            .map(|neighbor| Advertisement::new(self.name.clone(), neighbor.clone(), Arc::clone(&snapshot)))
            .collect()
    }

    /// Bellman-Ford relaxation of the `sender` column against its advertised
    /// table. Returns `true` if any cell changed.
    pub fn receive_advertisement(&mut self, sender: &str, sender_table: &DistanceTable) -> bool {
        if sender == self.name || !self.table.contains(sender) {
            return false;
        }

        let cost_to_sender = self.table.diagonal(sender);
        let destinations: Vec<RouterId> = self
            .table
            .destinations()
            .filter(|dest| dest.as_str() != sender)
            .cloned()
            .collect();

        let mut changed = false;
        for dest in destinations {
            let (via_sender, _) = sender_table.min_cost(&dest);
            changed |= self.table.set(&dest, sender, cost_to_sender + via_sender);
        }

        if changed {
            debug!("{}: table updated from advertisement of {}", self.name, sender);
        }
        self.dirty |= changed;
        changed
    }

    /// Pre-relaxes the `neighbor` column using the neighbor's converged
    /// routing table instead of its raw distance table.
    pub fn seed_from_routes(&mut self, neighbor: &str, routes: &RoutingTable) -> bool {
        if neighbor == self.name || !self.table.contains(neighbor) {
            return false;
        }

        let cost_to_neighbor = self.table.diagonal(neighbor);
        let mut changed = false;
        for entry in routes.iter() {
            if entry.destination == self.name {
                continue;
            }
            changed |= self
                .table
                .set(&entry.destination, neighbor, cost_to_neighbor + entry.cost);
        }

        if changed {
            debug!("{}: seeded column {} from its routing table", self.name, neighbor);
        }
        self.dirty |= changed;
        changed
    }

    pub fn routing_table(&self) -> RoutingTable {
        RoutingTable::derive(&self.table)
    }
}
