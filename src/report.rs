use std::collections::BTreeMap;
use std::io::Write;
use serde::Serialize;

use crate::RouterId;
use crate::algorithms::{Phase, RouterRegistry};
use crate::error::SimError;
use crate::protocol::{Cost, RoutingEntry, RoutingTable};
use crate::router::Router;

/// Sink for the snapshots produced while the simulation runs.
pub trait Reporter {
    fn distance_tables(&mut self, phase: Phase, t: u64, registry: &RouterRegistry) -> Result<(), SimError>;

    fn routing_tables(&mut self, phase: Phase, registry: &RouterRegistry) -> Result<(), SimError>;

    fn finish(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

/// Plain-text report: tab-separated distance tables and `dest,next_hop,cost`
/// routing lines.
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn write_distance_table<W: Write>(out: &mut W, router: &Router, t: u64) -> std::io::Result<()> {
    let table = router.table();
    let names: Vec<&RouterId> = table.destinations().collect();

    writeln!(out, "Distance Table of router {} at t={}", router.name(), t)?;
    let mut header = String::from(" ");
    for name in &names {
        header.push('\t');
        header.push_str(name);
    }
    writeln!(out, "{}", header)?;

    for dest in &names {
        let mut line = dest.to_string();
        for via in &names {
            line.push('\t');
            line.push_str(&table.get(dest, via).to_string());
        }
        writeln!(out, "{}", line)?;
    }
    writeln!(out)
}

pub fn write_routing_table<W: Write>(out: &mut W, name: &str, routes: &RoutingTable) -> std::io::Result<()> {
    writeln!(out, "Routing Table of router {}:", name)?;
    for entry in routes.iter() {
        match (&entry.next_hop, entry.cost) {
            (Some(next_hop), Cost::Finite(cost)) => {
                writeln!(out, "{},{},{}", entry.destination, next_hop, cost)?
            }
            _ => writeln!(out, "{},INF,INF", entry.destination)?,
        }
    }
    writeln!(out)
}

impl<W: Write> Reporter for TextReporter<W> {
    fn distance_tables(&mut self, _phase: Phase, t: u64, registry: &RouterRegistry) -> Result<(), SimError> {
        for router in registry.iter() {
            write_distance_table(&mut self.out, router, t)?;
        }
        Ok(())
    }

    fn routing_tables(&mut self, _phase: Phase, registry: &RouterRegistry) -> Result<(), SimError> {
        for router in registry.iter() {
            write_routing_table(&mut self.out, router.name(), &router.routing_table())?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SimError> {
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub t: u64,
    pub phase: Phase,
    /// router → destination → via → cost
    pub tables: BTreeMap<RouterId, BTreeMap<RouterId, BTreeMap<RouterId, Cost>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutingSnapshot {
    pub phase: Phase,
    pub tables: BTreeMap<RouterId, Vec<RoutingEntry>>,
}

/// Keeps every snapshot in memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryReporter {
    pub rounds: Vec<RoundSnapshot>,
    pub routing: Vec<RoutingSnapshot>,
}

impl MemoryReporter {
    pub fn last_routing(&self) -> Option<&RoutingSnapshot> {
        self.routing.last()
    }
}

impl Reporter for MemoryReporter {
    fn distance_tables(&mut self, phase: Phase, t: u64, registry: &RouterRegistry) -> Result<(), SimError> {
        let tables = registry
            .iter()
            .map(|router| {
                let rows: BTreeMap<_, _> = router
                    .table()
                    .rows()
                    .map(|(dest, row)| (dest.clone(), row.clone()))
                    .collect();
                (router.name().clone(), rows)
            })
            .collect();

        self.rounds.push(RoundSnapshot { t, phase, tables });
        Ok(())
    }

    fn routing_tables(&mut self, phase: Phase, registry: &RouterRegistry) -> Result<(), SimError> {
        let tables = registry
            .iter()
            .map(|router| (router.name().clone(), router.routing_table().iter().cloned().collect::<Vec<_>>()))
            .collect();

        self.routing.push(RoutingSnapshot { phase, tables });
        Ok(())
    }
}

/// Buffers snapshots and writes them as one JSON document on `finish`.
pub struct JsonReporter<W: Write> {
    out: W,
    report: MemoryReporter,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            report: MemoryReporter::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn distance_tables(&mut self, phase: Phase, t: u64, registry: &RouterRegistry) -> Result<(), SimError> {
        self.report.distance_tables(phase, t, registry)
    }

    fn routing_tables(&mut self, phase: Phase, registry: &RouterRegistry) -> Result<(), SimError> {
        self.report.routing_tables(phase, registry)
    }

    fn finish(&mut self) -> Result<(), SimError> {
        serde_json::to_writer_pretty(&mut self.out, &self.report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
