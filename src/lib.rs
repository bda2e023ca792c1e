//! Round-synchronous Distance Vector routing simulator.
//!
//! Routers exchange full distance-table snapshots with their neighbors once
//! per round until no table changes, then a topology-update batch is applied
//! and the network reconverges.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod input;
pub mod network;
pub mod protocol;
pub mod report;
pub mod router;
pub mod simulation;

pub type RouterId = String;

pub use config::SimulationConfig;
pub use error::SimError;
pub use input::Scenario;
pub use simulation::{run, RunSummary};
