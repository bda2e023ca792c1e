use serde::{Deserialize, Serialize};
use crate::RouterId;
use super::Topology;

/// Weight used in update batches to request removal of an edge.
pub const REMOVE_SENTINEL: i64 = -1;

/// One edge operation from a topology-update batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EdgeChange {
    Set { a: RouterId, b: RouterId, weight: u64 },
    Remove { a: RouterId, b: RouterId },
}

/// Outcome of applying a batch of [`EdgeChange`]s to a [`Topology`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Names that were not vertices before the batch, in first-seen order.
    pub new_nodes: Vec<RouterId>,
    /// Number of operations that actually altered an edge.
    pub edges_changed: usize,
}

impl BatchSummary {
    pub fn is_noop(&self) -> bool {
        self.new_nodes.is_empty() && self.edges_changed == 0
    }
}

/// Applies every operation in order. A removal never introduces a vertex.
pub fn apply_batch(topology: &mut Topology, batch: &[EdgeChange]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for change in batch {
        let changed = match change {
            EdgeChange::Set { a, b, weight } => {
                if a == b {
                    log::warn!("Ignoring self-loop on {}", a);
                    continue;
                }
                for node in [a, b] {
                    if topology.add_node(node) {
                        summary.new_nodes.push(node.clone());
                    }
                }
                topology.add_or_update_edge(a, b, *weight)
            }
            EdgeChange::Remove { a, b } => topology.remove_edge(a, b),
        };

        if changed {
            summary.edges_changed += 1;
        }
        log::debug!("Applied {:?} (changed: {})", change, changed);
    }

    summary
}
