use dv_sim::algorithms::{shortest_costs, ConvergenceEngine, Phase, RoundOutcome};
use dv_sim::config::{ReconvergenceMode, SimulationConfig};
use dv_sim::protocol::Cost;
use dv_sim::report::{JsonReporter, MemoryReporter, TextReporter};
use dv_sim::error::EngineError;
use dv_sim::{run, Scenario, SimError};

fn render(input: &str, config: &SimulationConfig) -> String {
    let scenario = Scenario::parse_str(input).unwrap();
    let mut reporter = TextReporter::new(Vec::new());
    run(&scenario, config, &mut reporter).unwrap();
    String::from_utf8(reporter.into_inner()).unwrap()
}

fn run_in_memory(input: &str, config: &SimulationConfig) -> MemoryReporter {
    let scenario = Scenario::parse_str(input).unwrap();
    let mut reporter = MemoryReporter::default();
    run(&scenario, config, &mut reporter).unwrap();
    reporter
}

fn routing_line_block<'a>(output: &'a str, router: &str) -> Vec<&'a str> {
    let header = format!("Routing Table of router {}:", router);
    let start = output.rfind(&header).expect("routing table printed");
    output[start..]
        .lines()
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn triangle_prefers_two_cheap_hops() {
    let output = render(include_str!("fixtures/triangle.in"), &SimulationConfig::default());
    assert_eq!(output, include_str!("fixtures/triangle.out"));
    assert_eq!(routing_line_block(&output, "A"), vec!["B,B,1", "C,B,2"]);
}

#[test]
fn edge_removal_reconverges() {
    let output = render(include_str!("fixtures/triangle_remove.in"), &SimulationConfig::default());
    assert_eq!(output, include_str!("fixtures/triangle_remove.out"));
    assert_eq!(routing_line_block(&output, "A"), vec!["B,C,6", "C,C,5"]);
    assert!(output.contains("Distance Table of router A at t=3"));
}

#[test]
fn disconnected_node_is_unreachable() {
    let output = render(include_str!("fixtures/isolated.in"), &SimulationConfig::default());
    assert_eq!(output, include_str!("fixtures/isolated.out"));
    assert_eq!(
        routing_line_block(&output, "D"),
        vec!["A,INF,INF", "B,INF,INF", "C,INF,INF"]
    );
}

#[test]
fn reasserted_edges_print_nothing_more() {
    let output = render(include_str!("fixtures/reassert.in"), &SimulationConfig::default());
    assert_eq!(output, include_str!("fixtures/reassert.out"));
    assert_eq!(output, render(include_str!("fixtures/triangle.in"), &SimulationConfig::default()));
    assert_eq!(output.matches("Routing Table of router A:").count(), 1);
}

#[test]
fn new_router_joins_during_update() {
    let output = render(include_str!("fixtures/new_node.in"), &SimulationConfig::default());
    assert_eq!(output, include_str!("fixtures/new_node.out"));
    assert_eq!(routing_line_block(&output, "W"), vec!["X,X,1", "Y,X,3", "Z,Z,1"]);
    assert_eq!(routing_line_block(&output, "Y"), vec!["W,X,3", "X,X,2", "Z,Z,3"]);
}

#[test]
fn round_counter_continues_after_update() {
    let report = run_in_memory(include_str!("fixtures/triangle_remove.in"), &SimulationConfig::default());
    let stamps: Vec<u64> = report.rounds.iter().map(|round| round.t).collect();
    let expected: Vec<u64> = (0..stamps.len() as u64).collect();
    assert_eq!(stamps, expected);

    let first_update = report
        .rounds
        .iter()
        .position(|round| round.phase == Phase::Update)
        .unwrap();
    assert_eq!(report.rounds[first_update].t, 3);
    assert_eq!(report.routing.len(), 2);
}

#[test]
fn seeded_and_plain_agree_on_final_routes() {
    let inputs = [
        include_str!("fixtures/triangle_remove.in"),
        include_str!("fixtures/new_node.in"),
        "A\nB\nC\nD\nSTART\nA B 1\nB C 2\nC D 1\nA D 7\nUPDATE\nB C 9\nA C 3\nB D -1\nEND\n",
    ];

    for input in inputs {
        let seeded = run_in_memory(input, &SimulationConfig::default());
        let plain = run_in_memory(
            input,
            &SimulationConfig {
                reconvergence: ReconvergenceMode::Plain,
                ..SimulationConfig::default()
            },
        );
        let seeded_routes = serde_json::to_value(&seeded.last_routing().unwrap().tables).unwrap();
        let plain_routes = serde_json::to_value(&plain.last_routing().unwrap().tables).unwrap();
        assert_eq!(seeded_routes, plain_routes);
    }
}

#[test]
fn converged_routes_match_dijkstra() {
    let config = SimulationConfig {
        verify: true,
        ..SimulationConfig::default()
    };
    let inputs = [
        include_str!("fixtures/triangle.in"),
        include_str!("fixtures/triangle_remove.in"),
        include_str!("fixtures/isolated.in"),
        include_str!("fixtures/new_node.in"),
        "P\nQ\nR\nS\nT\nSTART\nP Q 4\nQ R 0\nR S 2\nS T 1\nP T 3\nQ S 6\nUPDATE\nR S -1\nP R 1\nEND\n",
    ];

    for input in inputs {
        let scenario = Scenario::parse_str(input).unwrap();
        if let Err(err) = run(&scenario, &config, &mut MemoryReporter::default()) {
            panic!("verification failed: {err:?}");
        }
    }
}

#[test]
fn estimates_never_undercut_shortest_paths() {
    let scenario =
        Scenario::parse_str("A\nB\nC\nD\nE\nSTART\nA B 3\nB C 1\nC D 4\nD E 1\nA E 9\nB D 7\nUPDATE\nEND\n").unwrap();
    let topology = scenario.initial_topology();
    let mut engine = ConvergenceEngine::new(topology.clone());

    loop {
        for router in engine.registry().iter() {
            let shortest = shortest_costs(&topology, router.name());
            for (dest, row) in router.table().rows() {
                for cost in row.values() {
                    assert!(*cost >= shortest[dest], "{} underestimates {}", router.name(), dest);
                }
            }
        }
        if engine.step() != RoundOutcome::Changed {
            break;
        }
    }

    // One more round after convergence changes nothing.
    assert_eq!(engine.step(), RoundOutcome::Idle);
    for router in engine.registry().iter() {
        let shortest = shortest_costs(&topology, router.name());
        for entry in router.routing_table().iter() {
            assert_eq!(entry.cost, shortest[&entry.destination]);
        }
    }
}

#[test]
fn zero_weight_links_are_usable() {
    let output = render("A\nB\nC\nSTART\nA B 0\nB C 0\nUPDATE\nEND\n", &SimulationConfig::default());
    assert_eq!(routing_line_block(&output, "A"), vec!["B,B,0", "C,B,0"]);
}

#[test]
fn count_to_infinity_hits_round_limit() {
    let scenario = Scenario::parse_str("A\nB\nC\nSTART\nA B 1\nB C 1\nUPDATE\nB C -1\nEND\n").unwrap();
    let config = SimulationConfig {
        max_rounds: Some(50),
        ..SimulationConfig::default()
    };

    let err = run(&scenario, &config, &mut MemoryReporter::default()).unwrap_err();
    assert!(matches!(err, SimError::Engine(_)));
    assert!(err.to_string().contains("update phase"));
}

#[test]
fn json_output_mirrors_text_rounds() {
    let input = include_str!("fixtures/triangle_remove.in");
    let report = run_in_memory(input, &SimulationConfig::default());
    let text = render(input, &SimulationConfig::default());

    assert_eq!(report.rounds.len(), text.matches("Distance Table of router A at").count());
    let last = report.rounds.last().unwrap();
    assert_eq!(last.tables["C"]["A"]["B"], Cost::Finite(7));
    assert_eq!(last.tables["A"]["B"]["B"], Cost::Infinite);
}

#[test]
fn json_report_survives_round_limit() {
    let scenario = Scenario::parse_str("A\nB\nC\nSTART\nA B 1\nB C 1\nUPDATE\nB C -1\nEND\n").unwrap();
    let config = SimulationConfig {
        max_rounds: Some(5),
        verify: true,
        ..SimulationConfig::default()
    };

    let mut json = JsonReporter::new(Vec::new());
    let err = run(&scenario, &config, &mut json).unwrap_err();
    assert!(matches!(
        err,
        SimError::Engine(EngineError::RoundLimitExceeded { phase: Phase::Update, limit: 5 })
    ));

    let document: serde_json::Value = serde_json::from_slice(&json.into_inner()).unwrap();
    let rounds = document["rounds"].as_array().unwrap();
    let update_rounds = rounds.iter().filter(|round| round["phase"] == "update").count();
    assert_eq!(update_rounds, 6);
    assert_eq!(document["routing"].as_array().unwrap().len(), 1);
    assert_eq!(document["routing"][0]["phase"], "initial");

    let mut text = TextReporter::new(Vec::new());
    assert!(run(&scenario, &config, &mut text).is_err());
    let text = String::from_utf8(text.into_inner()).unwrap();
    assert_eq!(rounds.len(), text.matches("Distance Table of router A at").count());
}
