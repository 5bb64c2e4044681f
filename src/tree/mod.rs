//! Minimum spanning trees of complete metric graphs.
//!
//! Two algorithms are offered: a dense O(n²) variant of Prim's algorithm that never
//! materializes the edge list (the default), and Kruskal's algorithm on the sorted list of all
//! n(n-1)/2 edges. Both break ties deterministically, so repeated runs yield identical trees.

pub mod kruskal;
pub mod prim;

use std::{fmt, str::FromStr};

use log::debug;
use serde::Serialize;

use crate::{
    errors::{InvariantCheck, Result, TspError},
    graph::*,
};

pub use kruskal::kruskal;
pub use prim::prim;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize)]
pub enum MstAlgorithm {
    #[default]
    Prim,
    Kruskal,
}

impl fmt::Display for MstAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MstAlgorithm::Prim => f.write_str("prim"),
            MstAlgorithm::Kruskal => f.write_str("kruskal"),
        }
    }
}

impl FromStr for MstAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prim" => Ok(MstAlgorithm::Prim),
            "kruskal" => Ok(MstAlgorithm::Kruskal),
            _ => Err(format!("unknown spanning tree algorithm '{s}'")),
        }
    }
}

/// Computes a minimum spanning tree of `graph` with the requested algorithm.
///
/// Fails with [`TspError::DisconnectedGraph`] if no spanning tree exists, which for complete
/// graphs only happens if some weights are not finite.
pub fn minimum_spanning_tree<G: MetricGraph>(
    graph: &G,
    algorithm: MstAlgorithm,
) -> Result<SpanningTree> {
    let tree = match algorithm {
        MstAlgorithm::Prim => prim(graph)?,
        MstAlgorithm::Kruskal => kruskal(graph)?,
    };

    debug!(
        "{algorithm} spanning tree over {} nodes with weight {:.4}",
        tree.number_of_nodes(),
        tree.total_weight()
    );

    Ok(tree)
}

/// A spanning tree of a graph over the nodes `0..n`: exactly n-1 edges, connected, acyclic.
#[derive(Clone, Debug)]
pub struct SpanningTree {
    adjacency: MultiGraph,
    edges: Vec<WeightedEdge>,
    weight: Weight,
}

impl SpanningTree {
    /// Assembles a tree from its edges and verifies the tree invariants.
    ///
    /// Fails with [`TspError::DisconnectedGraph`] if there are not exactly n-1 edges or they do
    /// not connect all nodes.
    pub fn try_from_edges(n: NumNodes, edges: Vec<WeightedEdge>) -> Result<Self> {
        let adjacency = MultiGraph::from_edges(n, edges.iter().map(|e| e.edge));
        let weight = edges.iter().map(|e| e.weight).sum();
        let tree = Self {
            adjacency,
            edges,
            weight,
        };
        tree.is_correct()?;
        Ok(tree)
    }

    /// Edges in the order they were selected by the algorithm
    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    pub fn total_weight(&self) -> Weight {
        self.weight
    }

    /// The tree as a multigraph (without parallel edges); the basis of the Christofides
    /// multigraph
    pub fn as_multigraph(&self) -> &MultiGraph {
        &self.adjacency
    }

    pub fn into_multigraph(self) -> MultiGraph {
        self.adjacency
    }
}

impl GraphNodeOrder for SpanningTree {
    fn number_of_nodes(&self) -> NumNodes {
        self.adjacency.number_of_nodes()
    }
}

impl GraphEdgeOrder for SpanningTree {
    fn number_of_edges(&self) -> NumEdges {
        self.edges.len() as NumEdges
    }
}

impl AdjacencyList for SpanningTree {
    fn neighbors_of(&self, u: Node) -> &[Node] {
        self.adjacency.neighbors_of(u)
    }
}

impl InvariantCheck<TspError> for SpanningTree {
    fn is_correct(&self) -> Result<()> {
        let expected = self.len().saturating_sub(1);
        if self.edges.len() != expected || !self.is_connected() {
            return Err(TspError::DisconnectedGraph {
                found: self.edges.len(),
                expected,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn tree_invariants() {
        let edges = |list: &[(Node, Node)]| {
            list.iter()
                .map(|&(u, v)| WeightedEdge::new(Edge(u, v), 1.0))
                .collect::<Vec<_>>()
        };

        let tree = SpanningTree::try_from_edges(4, edges(&[(0, 1), (1, 2), (1, 3)])).unwrap();
        assert_eq!(tree.total_weight(), 3.0);
        assert_eq!(tree.odd_degree_vertices(), vec![0, 1, 2, 3]);

        // cycle plus isolated node
        assert!(matches!(
            SpanningTree::try_from_edges(4, edges(&[(0, 1), (1, 2), (2, 0)])),
            Err(TspError::DisconnectedGraph {
                found: 3,
                expected: 3
            })
        ));

        assert!(matches!(
            SpanningTree::try_from_edges(4, edges(&[(0, 1), (2, 3)])),
            Err(TspError::DisconnectedGraph { .. })
        ));
    }

    #[test]
    fn prim_and_kruskal_agree_on_weight() {
        let mut rng = Pcg64::seed_from_u64(0x5eed);
        for n in [2, 3, 5, 17, 60] {
            let graph = random_graph(&mut rng, n);
            let p = minimum_spanning_tree(&graph, MstAlgorithm::Prim).unwrap();
            let k = minimum_spanning_tree(&graph, MstAlgorithm::Kruskal).unwrap();

            assert_eq!(p.number_of_edges(), n as NumEdges - 1);
            assert_eq!(k.number_of_edges(), n as NumEdges - 1);
            assert_close(p.total_weight(), k.total_weight());
        }
    }

    #[test]
    fn tree_weight_is_minimal_for_small_graphs() {
        let mut rng = Pcg64::seed_from_u64(99);
        for n in 2..=6 {
            let graph = random_graph(&mut rng, n);
            let tree = minimum_spanning_tree(&graph, MstAlgorithm::Prim).unwrap();
            assert_close(tree.total_weight(), brute_force_mst_weight(&graph));
        }
    }

    #[test]
    fn infinite_weights_disconnect() {
        let graph =
            CompleteGraph::try_from_vertices([(1, f64::MAX, 0.0), (2, -f64::MAX, 0.0)]).unwrap();
        for algo in [MstAlgorithm::Prim, MstAlgorithm::Kruskal] {
            assert!(matches!(
                minimum_spanning_tree(&graph, algo),
                Err(TspError::DisconnectedGraph {
                    found: 0,
                    expected: 1
                })
            ));
        }
    }

    #[test]
    fn parse_algorithm() {
        assert_eq!("Prim".parse::<MstAlgorithm>(), Ok(MstAlgorithm::Prim));
        assert_eq!("kruskal".parse::<MstAlgorithm>(), Ok(MstAlgorithm::Kruskal));
        assert!("boruvka".parse::<MstAlgorithm>().is_err());
        assert_eq!(MstAlgorithm::default().to_string(), "prim");
    }
}
