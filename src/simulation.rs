use log::{info, warn};
use serde::Serialize;

use crate::algorithms::{apply_topology_change, verify_routes, ConvergenceEngine, Phase, RouteMismatch};
use crate::config::SimulationConfig;
use crate::error::{SimError, VerifyError};
use crate::input::Scenario;
use crate::report::Reporter;

/// What a completed run looked like.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Time stamp the next snapshot would have carried.
    pub next_round: u64,
    pub initial_rounds: u64,
    /// `None` when the update batch left every table untouched.
    pub update_rounds: Option<u64>,
}

/// Runs the whole scenario: initial convergence, routing tables, the update
/// batch and, if it changed anything, a second convergence.
///
/// The reporter is finished even when the engine gives up, so buffered
/// reporters still emit every round produced so far. With `verify` set, any
/// route that disagrees with Dijkstra fails the run with [`VerifyError`]
/// after the report is complete.
pub fn run<R: Reporter + ?Sized>(
    scenario: &Scenario,
    config: &SimulationConfig,
    reporter: &mut R,
) -> Result<RunSummary, SimError> {
    let mut engine = ConvergenceEngine::new(scenario.initial_topology()).with_max_rounds(config.max_rounds);
    let mut summary = RunSummary::default();
    let mut mismatches = Vec::new();

    let outcome = run_phases(scenario, config, &mut engine, reporter, &mut summary, &mut mismatches);
    let finished = reporter.finish();
    outcome?;
    finished?;

    summary.next_round = engine.round();
    verdict(summary, mismatches)
}

fn verdict(summary: RunSummary, mismatches: Vec<RouteMismatch>) -> Result<RunSummary, SimError> {
    if mismatches.is_empty() {
        Ok(summary)
    } else {
        Err(VerifyError { mismatches }.into())
    }
}

fn run_phases<R: Reporter + ?Sized>(
    scenario: &Scenario,
    config: &SimulationConfig,
    engine: &mut ConvergenceEngine,
    reporter: &mut R,
    summary: &mut RunSummary,
    mismatches: &mut Vec<RouteMismatch>,
) -> Result<(), SimError> {
    engine.record_round(Phase::Initial, reporter)?;
    summary.initial_rounds = engine.converge(Phase::Initial, reporter)?;
    reporter.routing_tables(Phase::Initial, engine.registry())?;
    if config.verify {
        mismatches.extend(check_routes(engine));
    }

    if apply_topology_change(engine, &scenario.updates, config.reconvergence) {
        engine.record_round(Phase::Update, reporter)?;
        summary.update_rounds = Some(engine.converge(Phase::Update, reporter)?);
        reporter.routing_tables(Phase::Update, engine.registry())?;
        if config.verify {
            mismatches.extend(check_routes(engine));
        }
    } else {
        info!("Update batch changed no table, nothing to report");
    }
    Ok(())
}

fn check_routes(engine: &ConvergenceEngine) -> Vec<RouteMismatch> {
    let mismatches = verify_routes(engine.topology(), engine.registry());
    for mismatch in &mismatches {
        warn!(
            "Router {} reaches {} at {} but the shortest path costs {}",
            mismatch.router, mismatch.destination, mismatch.advertised, mismatch.shortest
        );
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;

    const LINE_WITH_SHORTCUT: &str = "A\nB\nC\nSTART\nA B 1\nB C 1\nA C 9\nUPDATE\nEND\n";

    #[test]
    fn test_unconverged_tables_fail_verification() {
        // Only direct links are loaded, so A still routes to C over the 9 link.
        let scenario = Scenario::parse_str(LINE_WITH_SHORTCUT).unwrap();
        let engine = ConvergenceEngine::new(scenario.initial_topology());

        let mismatches = check_routes(&engine);
        assert!(mismatches.iter().any(|m| m.router == "A" && m.destination == "C"));

        let err = verdict(RunSummary::default(), mismatches).unwrap_err();
        match &err {
            SimError::Verify(VerifyError { mismatches }) => assert_eq!(mismatches.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string(), "2 routes disagree with the shortest paths");
    }

    #[test]
    fn test_converged_run_passes_verification() {
        let scenario = Scenario::parse_str(LINE_WITH_SHORTCUT).unwrap();
        let config = SimulationConfig {
            verify: true,
            ..SimulationConfig::default()
        };

        let summary = run(&scenario, &config, &mut MemoryReporter::default()).unwrap();
        assert!(summary.initial_rounds > 0);
        assert_eq!(summary.update_rounds, None);
    }
}
