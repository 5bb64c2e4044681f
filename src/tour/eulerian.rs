use itertools::Itertools;

use crate::{
    errors::{Result, TspError},
    graph::*,
    utils::NodeMarker,
};

/// Fails with [`TspError::MatchingFailure`] unless every node has even degree, which is
/// required for an Eulerian circuit to exist
pub fn ensure_even_degrees<G: AdjacencyList>(graph: &G) -> Result<()> {
    let odd = graph.odd_degree_vertices();
    if odd.is_empty() {
        return Ok(());
    }

    Err(TspError::MatchingFailure(format!(
        "{} nodes keep an odd degree, e.g. {}",
        odd.len(),
        odd.iter().take(5).join(", ")
    )))
}

/// Computes an Eulerian circuit with Hierholzer's algorithm, starting and ending at `start`.
///
/// Edges are consumed by id, so parallel edges are each traversed once. At every node the
/// incident edges are tried in insertion order, which makes the circuit deterministic.
/// Returns the sequence of visited nodes (of length m + 1). Fails with
/// [`TspError::DisconnectedGraph`] if the edges with at least one endpoint reachable from
/// `start` do not cover the whole graph.
pub fn eulerian_circuit(graph: &MultiGraph, start: Node) -> Result<Vec<Node>> {
    let m = graph.number_of_edges() as usize;

    let mut used = vec![false; m];
    // position of the first possibly unused incident edge per node
    let mut cursor = vec![0usize; graph.len()];
    let mut stack = vec![start];
    let mut circuit = Vec::with_capacity(m + 1);

    while let Some(&u) = stack.last() {
        let incident = graph.incident_edges_of(u);
        let pos = &mut cursor[u as usize];
        while *pos < incident.len() && used[incident[*pos] as usize] {
            *pos += 1;
        }

        match incident.get(*pos) {
            Some(&id) => {
                used[id as usize] = true;
                stack.push(graph.edge(id).other(u));
            }
            None => {
                circuit.push(u);
                stack.pop();
            }
        }
    }

    circuit.reverse();

    if circuit.len() != m + 1 {
        return Err(TspError::DisconnectedGraph {
            found: circuit.len() - 1,
            expected: m,
        });
    }

    Ok(circuit)
}

/// Keeps the first occurrence of each node of `circuit` and closes the result by returning
/// to its first node
pub fn shortcut(circuit: &[Node], number_of_nodes: NumNodes) -> Vec<Node> {
    let mut seen = NodeMarker::new(number_of_nodes, false);
    let mut tour = circuit
        .iter()
        .copied()
        .filter(|&u| seen.try_mark(u))
        .collect_vec();

    if let Some(&first) = tour.first() {
        tour.push(first);
    }

    tour
}
