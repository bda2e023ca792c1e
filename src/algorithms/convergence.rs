use std::fmt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, SimError};
use crate::network::Topology;
use crate::protocol::Advertisement;
use crate::report::Reporter;
use super::RouterRegistry;

/// Which run of the round loop is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initial,
    Update,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initial => f.write_str("initial"),
            Phase::Update => f.write_str("update"),
        }
    }
}

/// Result of one synchronous round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Nobody had anything to advertise.
    Idle,
    /// Advertisements were delivered but no table changed.
    Converged,
    /// At least one table changed; another round is needed.
    Changed,
}

/// Drives synchronous distance-vector rounds over every router.
///
/// The round counter is shared by all phases: it keeps counting after a
/// topology change instead of restarting at zero.
#[derive(Debug)]
pub struct ConvergenceEngine {
    topology: Topology,
    registry: RouterRegistry,
    round: u64,
    max_rounds: Option<u64>,
}

impl ConvergenceEngine {
    /// Builds one router per vertex and loads every direct-link cost.
    pub fn new(topology: Topology) -> Self {
        let mut registry = RouterRegistry::from_topology(&topology);
        for router in registry.iter_mut() {
            router.apply_topology(&topology);
        }
        info!(
            "Engine ready: {} routers, {} links",
            registry.len(),
            topology.edge_count()
        );

        Self {
            topology,
            registry,
            round: 0,
            max_rounds: None,
        }
    }

    /// Caps the number of rounds a single call to [`converge`](Self::converge)
    /// may run. `None` lets the loop run until a fixed point.
    pub fn with_max_rounds(mut self, max_rounds: Option<u64>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub(crate) fn topology_mut(&mut self) -> &mut Topology {
        &mut self.topology
    }

    pub fn registry(&self) -> &RouterRegistry {
        &self.registry
    }

    pub(crate) fn parts_mut(&mut self) -> (&Topology, &mut RouterRegistry) {
        (&self.topology, &mut self.registry)
    }

    /// Time stamp the next recorded snapshot will carry.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Hands the current tables to `reporter` under the current time stamp and
    /// advances the counter.
    pub fn record_round<R: Reporter + ?Sized>(&mut self, phase: Phase, reporter: &mut R) -> Result<(), SimError> {
        reporter.distance_tables(phase, self.round, &self.registry)?;
        self.round += 1;
        Ok(())
    }

    /// Every dirty router snapshots its table for each of its neighbors and
    /// becomes clean.
    pub fn collect(&mut self) -> Vec<Advertisement> {
        let topology = &self.topology;
        self.registry
            .iter_mut()
            .flat_map(|router| router.advertise(topology))
            .collect()
    }

    /// Applies advertisements collected at the start of the round. Returns
    /// `true` if any table changed.
    pub fn deliver(&mut self, advertisements: Vec<Advertisement>) -> bool {
        let mut changed = false;
        for ad in advertisements {
            match self.registry.get_mut(&ad.recipient) {
                Some(router) => changed |= router.receive_advertisement(&ad.sender, &ad.table),
                None => debug!("Dropping advertisement from {} to unknown {}", ad.sender, ad.recipient),
            }
        }
        changed
    }

    /// One collect/deliver cycle without reporting.
    pub fn step(&mut self) -> RoundOutcome {
        if !self.registry.any_dirty() {
            return RoundOutcome::Idle;
        }

        let advertisements = self.collect();
        debug!("Round {}: delivering {} advertisements", self.round, advertisements.len());
        self.deliver(advertisements);

        if self.registry.any_dirty() {
            RoundOutcome::Changed
        } else {
            RoundOutcome::Converged
        }
    }

    /// Runs rounds until no table changes, recording the snapshot of every
    /// round that changed something. Returns the number of recorded rounds.
    pub fn converge<R: Reporter + ?Sized>(&mut self, phase: Phase, reporter: &mut R) -> Result<u64, SimError> {
        let mut rounds = 0;

        loop {
            if let Some(limit) = self.max_rounds {
                if rounds >= limit && self.registry.any_dirty() {
                    warn!("{} phase still changing after {} rounds, giving up", phase, limit);
                    return Err(EngineError::RoundLimitExceeded { phase, limit }.into());
                }
            }

            match self.step() {
                RoundOutcome::Idle | RoundOutcome::Converged => break,
                RoundOutcome::Changed => {
                    self.record_round(phase, reporter)?;
                    rounds += 1;
                }
            }
        }

        info!("{} phase converged after {} rounds (next t={})", phase, rounds, self.round);
        Ok(rounds)
    }
}
