use super::*;
use crate::utils::UnionFind;

/// Kruskal's algorithm: sorts all edges by `(weight, u, v)` and greedily keeps those joining
/// two components. Needs O(n²) memory for the edge list; edges of infinite weight are treated
/// as absent.
pub fn kruskal<G: MetricGraph>(graph: &G) -> Result<SpanningTree> {
    let n = graph.number_of_nodes();
    let expected = graph.len().saturating_sub(1);

    let mut candidates: Vec<WeightedEdge> = graph
        .weighted_edges()
        .filter(|e| e.weight.is_finite())
        .collect();
    candidates.sort_unstable_by(WeightedEdge::cmp_by_weight);

    let mut components = UnionFind::new(n);
    let mut edges = Vec::with_capacity(expected);

    for candidate in candidates {
        if edges.len() == expected {
            break;
        }

        let Edge(u, v) = candidate.edge;
        if components.union(u, v) {
            edges.push(candidate);
        }
    }

    if edges.len() != expected {
        return Err(TspError::DisconnectedGraph {
            found: edges.len(),
            expected,
        });
    }

    SpanningTree::try_from_edges(n, edges)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn picks_lightest_edges_first() {
        let graph = CompleteGraph::try_from_vertices([
            (10, 0.0, 0.0),
            (20, 5.0, 0.0),
            (30, 0.0, 1.0),
            (40, 5.0, 2.0),
        ])
        .unwrap();

        let tree = kruskal(&graph).unwrap();
        let edges: Vec<_> = tree.edges().iter().map(|e| e.edge).collect();
        assert_eq!(edges, vec![Edge(0, 2), Edge(1, 3), Edge(0, 1)]);
        assert_eq!(tree.degrees().collect::<Vec<_>>(), vec![2, 2, 1, 1]);
    }
}
