use std::io::BufRead;
use log::{debug, warn};

use crate::RouterId;
use crate::error::InputError;
use crate::network::{EdgeChange, Topology, REMOVE_SENTINEL};

const START: &str = "START";
const UPDATE: &str = "UPDATE";
const END: &str = "END";

/// Parsed simulation input: node names, initial links and the update batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    pub nodes: Vec<RouterId>,
    pub edges: Vec<EdgeChange>,
    pub updates: Vec<EdgeChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Nodes,
    Edges,
    Updates,
    Done,
}

impl Scenario {
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, InputError> {
        let mut scenario = Scenario::default();
        let mut section = Section::Nodes;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let line = line.trim();

            match (section, line) {
                (Section::Done, _) => break,
                (_, "") => continue,
                (Section::Nodes, START) => section = Section::Edges,
                (Section::Edges, UPDATE) => section = Section::Updates,
                (Section::Updates, END) => section = Section::Done,
                (Section::Nodes, name) => {
                    if !scenario.nodes.iter().any(|known| known == name) {
                        scenario.nodes.push(name.to_string());
                    }
                }
                (Section::Edges, text) => {
                    if let Some(edge) = parse_edge(line_no, text, false)? {
                        scenario.edges.push(edge);
                    }
                }
                (Section::Updates, text) => {
                    if let Some(change) = parse_edge(line_no, text, true)? {
                        scenario.updates.push(change);
                    }
                }
            }
        }

        if section != Section::Done {
            debug!("Input ended before END, treating remaining sections as empty");
        }
        Ok(scenario)
    }

    pub fn parse_str(text: &str) -> Result<Self, InputError> {
        Self::parse(text.as_bytes())
    }

    /// Topology described by the node list and the initial links.
    pub fn initial_topology(&self) -> Topology {
        let mut topology = Topology::new();
        for node in &self.nodes {
            topology.add_node(node);
        }
        for edge in &self.edges {
            if let EdgeChange::Set { a, b, weight } = edge {
                topology.add_or_update_edge(a, b, *weight);
            }
        }
        topology
    }
}

/// Parses `NODE1 NODE2 WEIGHT`. A weight of -1 means removal and is only
/// accepted in the update batch. Self-loops are dropped once their weight
/// has been validated.
fn parse_edge(line_no: usize, text: &str, allow_removal: bool) -> Result<Option<EdgeChange>, InputError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [a, b, weight] = tokens.as_slice() else {
        return Err(InputError::MalformedLine {
            line: line_no,
            content: text.to_string(),
        });
    };

    let change = match weight.parse::<u64>() {
        Ok(weight) => EdgeChange::Set {
            a: a.to_string(),
            b: b.to_string(),
            weight,
        },
        Err(_) => match weight.parse::<i64>() {
            Ok(REMOVE_SENTINEL) if allow_removal => EdgeChange::Remove {
                a: a.to_string(),
                b: b.to_string(),
            },
            Ok(negative) => {
                return Err(InputError::NegativeWeight {
                    line: line_no,
                    weight: negative,
                });
            }
            Err(_) => {
                return Err(InputError::InvalidWeight {
                    line: line_no,
                    weight: weight.to_string(),
                });
            }
        },
    };

    if a == b {
        warn!("line {}: ignoring self-loop on {}", line_no, a);
        return Ok(None);
    }
    Ok(Some(change))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "A\nB\nC\nSTART\nA B 1\nB C 1\nA C 5\nUPDATE\nA B -1\nC D 2\nEND\n";

    #[test]
    fn test_parse_sections() {
        let scenario = Scenario::parse_str(TRIANGLE).unwrap();
        assert_eq!(scenario.nodes, vec!["A", "B", "C"]);
        assert_eq!(scenario.edges.len(), 3);
        assert_eq!(
            scenario.updates,
            vec![
                EdgeChange::Remove { a: "A".into(), b: "B".into() },
                EdgeChange::Set { a: "C".into(), b: "D".into(), weight: 2 },
            ]
        );
    }

    #[test]
    fn test_initial_topology() {
        let topology = Scenario::parse_str(TRIANGLE).unwrap().initial_topology();
        assert_eq!(topology.cost_between("C", "A"), Some(5));
        assert!(!topology.contains("D"));
    }

    #[test]
    fn test_whitespace_and_blank_lines() {
        let scenario = Scenario::parse_str("  X \n\nY\nSTART\n\nX\t Y   3\nUPDATE\nEND\n").unwrap();
        assert_eq!(scenario.nodes, vec!["X", "Y"]);
        assert_eq!(
            scenario.edges,
            vec![EdgeChange::Set { a: "X".into(), b: "Y".into(), weight: 3 }]
        );
        assert!(scenario.updates.is_empty());
    }

    #[test]
    fn test_missing_terminators() {
        let scenario = Scenario::parse_str("A\nB\nSTART\nA B 2\n").unwrap();
        assert_eq!(scenario.edges.len(), 1);
        assert!(scenario.updates.is_empty());
    }

    #[test]
    fn test_edge_to_unlisted_node() {
        let scenario = Scenario::parse_str("A\nSTART\nA Q 4\nUPDATE\nEND\n").unwrap();
        let topology = scenario.initial_topology();
        assert_eq!(topology.nodes().cloned().collect::<Vec<_>>(), vec!["A", "Q"]);
    }

    #[test]
    fn test_duplicate_nodes_collapse() {
        let scenario = Scenario::parse_str("A\nA\nSTART\nUPDATE\nEND\n").unwrap();
        assert_eq!(scenario.nodes, vec!["A"]);
    }

    #[test]
    fn test_malformed_line() {
        let err = Scenario::parse_str("A\nSTART\nA B\nUPDATE\nEND\n").unwrap_err();
        assert!(matches!(err, InputError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn test_invalid_weight() {
        let err = Scenario::parse_str("A\nSTART\nA B x\n").unwrap_err();
        assert!(matches!(err, InputError::InvalidWeight { line: 3, .. }));
    }

    #[test]
    fn test_removal_only_in_updates() {
        let err = Scenario::parse_str("A\nSTART\nA B -1\n").unwrap_err();
        assert!(matches!(err, InputError::NegativeWeight { line: 3, weight: -1 }));

        let err = Scenario::parse_str("A\nSTART\nUPDATE\nA B -4\nEND\n").unwrap_err();
        assert!(matches!(err, InputError::NegativeWeight { line: 4, weight: -4 }));
    }

    #[test]
    fn test_self_loop_dropped() {
        let scenario = Scenario::parse_str("A\nSTART\nA A 3\nUPDATE\nA A -1\nEND\n").unwrap();
        assert!(scenario.edges.is_empty());
        assert!(scenario.updates.is_empty());
    }

    #[test]
    fn test_self_loop_weight_still_checked() {
        let err = Scenario::parse_str("A\nSTART\nA A x\n").unwrap_err();
        assert!(matches!(err, InputError::InvalidWeight { line: 3, .. }));

        let err = Scenario::parse_str("A\nSTART\nUPDATE\nA A -7\nEND\n").unwrap_err();
        assert!(matches!(err, InputError::NegativeWeight { line: 4, weight: -7 }));

        let err = Scenario::parse_str("A\nSTART\nA A -1\n").unwrap_err();
        assert!(matches!(err, InputError::NegativeWeight { line: 3, weight: -1 }));
    }

    #[test]
    fn test_lines_after_end_ignored() {
        let scenario = Scenario::parse_str("A\nSTART\nUPDATE\nEND\ngarbage line here\n").unwrap();
        assert!(scenario.updates.is_empty());
    }
}
