use super::*;
use crate::utils::NodeMarker;

/// Dense Prim's algorithm in O(n²) time and O(n) memory, rooted at node 0.
///
/// Each round relaxes the keys of all nodes outside the tree against the node added last and
/// simultaneously selects the node with the smallest key. Among equal keys the lowest node id
/// wins, and a key is only replaced by a strictly smaller weight, so the result is
/// deterministic.
pub fn prim<G: MetricGraph>(graph: &G) -> Result<SpanningTree> {
    let n = graph.number_of_nodes();
    let expected = graph.len().saturating_sub(1);

    if n == 0 {
        return SpanningTree::try_from_edges(0, Vec::new());
    }

    // cheapest known connection of each node into the tree
    let mut key = vec![Weight::INFINITY; n as usize];
    let mut parent: Vec<Node> = vec![0; n as usize];
    let mut in_tree = NodeMarker::new(n, false);
    let mut edges = Vec::with_capacity(expected);

    let mut last_added: Node = 0;
    in_tree.try_mark(last_added);

    for _ in 1..n {
        let mut next: Option<Node> = None;

        for v in graph.vertices() {
            if in_tree.is_marked(v) {
                continue;
            }

            let w = graph.weight(last_added, v);
            if w < key[v as usize] {
                key[v as usize] = w;
                parent[v as usize] = last_added;
            }

            if key[v as usize].is_finite()
                && next.is_none_or(|best| key[v as usize] < key[best as usize])
            {
                next = Some(v);
            }
        }

        let Some(v) = next else {
            return Err(TspError::DisconnectedGraph {
                found: edges.len(),
                expected,
            });
        };

        in_tree.try_mark(v);
        edges.push(WeightedEdge::new(Edge(parent[v as usize], v), key[v as usize]));
        last_added = v;
    }

    SpanningTree::try_from_edges(n, edges)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unit_square() {
        let graph = CompleteGraph::try_from_vertices([
            (1, 0.0, 0.0),
            (2, 0.0, 1.0),
            (3, 1.0, 1.0),
            (4, 1.0, 0.0),
        ])
        .unwrap();

        let tree = prim(&graph).unwrap();
        let edges: Vec<_> = tree.edges().iter().map(|e| e.edge).collect();
        assert_eq!(edges, vec![Edge(0, 1), Edge(1, 2), Edge(0, 3)]);
        assert_eq!(tree.total_weight(), 3.0);
    }

    #[test]
    fn collinear() {
        let graph =
            CompleteGraph::try_from_vertices([(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0)])
                .unwrap();
        let tree = prim(&graph).unwrap();
        let edges: Vec<_> = tree.edges().iter().map(|e| e.edge).collect();
        assert_eq!(edges, vec![Edge(0, 1), Edge(1, 2)]);
    }
}
