use std::collections::BTreeMap;
use crate::RouterId;
use crate::network::Topology;
use crate::protocol::RoutingTable;
use crate::router::Router;

/// Directory of every router in the simulation, keyed and iterated by name.
#[derive(Debug, Clone, Default)]
pub struct RouterRegistry {
    routers: BTreeMap<RouterId, Router>,
}

impl RouterRegistry {
    pub fn new() -> Self {
        Self {
            routers: BTreeMap::new(),
        }
    }

    /// One router per topology vertex, each with an all-infinite table.
    pub fn from_topology(topology: &Topology) -> Self {
        let routers = topology
            .nodes()
            .map(|name| (name.clone(), Router::new(name, topology.nodes())))
            .collect();
        Self { routers }
    }

    /// Adds a router that joined after initialization and widens every
    /// existing table with it. Returns `false` if the name is already known.
    pub fn insert_node(&mut self, name: &str) -> bool {
        if self.routers.contains_key(name) {
            return false;
        }

        for router in self.routers.values_mut() {
            router.add_node(name);
        }
        let mut names: Vec<RouterId> = self.routers.keys().cloned().collect();
        names.push(name.to_string());
        self.routers.insert(name.to_string(), Router::new(name, &names));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Router> {
        self.routers.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Router> {
        self.routers.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routers.contains_key(name)
    }

    /// Routers in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Router> {
        self.routers.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Router> {
        self.routers.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &RouterId> {
        self.routers.keys()
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn any_dirty(&self) -> bool {
        self.routers.values().any(Router::is_dirty)
    }

    pub fn routing_tables(&self) -> BTreeMap<RouterId, RoutingTable> {
        self.routers
            .iter()
            .map(|(name, router)| (name.clone(), router.routing_table()))
            .collect()
    }
}
