use std::sync::Arc;
use crate::RouterId;
use super::DistanceTable;

/// Snapshot of a router's distance table addressed to one neighbor.
///
/// The table is copied once per sender per round and shared between that
/// round's recipients; it can never observe later changes to the sender.
#[derive(Debug, Clone)]
pub struct Advertisement {
    pub sender: RouterId,
    pub recipient: RouterId,
    pub table: Arc<DistanceTable>,
}

impl Advertisement {
    pub fn new(sender: RouterId, recipient: RouterId, table: Arc<DistanceTable>) -> Self {
        Self {
            sender,
            recipient,
            table,
        }
    }
}
