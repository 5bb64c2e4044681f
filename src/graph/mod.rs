pub mod complete;
pub mod edge;
pub mod multigraph;
pub mod node_mapper;
pub mod point;
pub mod random;
pub mod traversal;

pub type Node = u32;
pub type NumNodes = Node;
pub type NumEdges = u64;
pub type EdgeId = u32;

/// Identifier of a city as written in the input; nodes are dense indices into the graph
pub type VertexId = u64;
pub type Weight = f64;

use std::ops::Range;

pub use complete::*;
pub use edge::*;
pub use multigraph::*;
pub use node_mapper::*;
pub use point::*;
pub use random::*;
pub use traversal::*;

/// Provides getters pertaining to the size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V. Nodes are always the dense range `0..n`.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns true if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

#[macro_export]
macro_rules! node_iterator {
    ($iter : ident, $single : ident, $type : ty) => {
        fn $iter(&self) -> impl Iterator<Item = $type> + '_ {
            self.vertices().map(|u| self.$single(u))
        }
    };
}

pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns a slice of neighbors of a given vertex. Parallel edges show up repeatedly.
    /// ** Panics if the v >= n **
    fn neighbors_of(&self, u: Node) -> &[Node];

    /// Returns the number of neighbors of from [`u`]
    fn degree_of(&self, u: Node) -> NumNodes {
        self.neighbors_of(u).len() as NumNodes
    }

    /// Returns all nodes with odd degree in increasing order
    fn odd_degree_vertices(&self) -> Vec<Node> {
        self.vertices()
            .filter(|&u| self.degree_of(u) % 2 == 1)
            .collect()
    }

    node_iterator!(degrees, degree_of, NumNodes);
    node_iterator!(neighbors, neighbors_of, &[Node]);
}

/// A complete graph whose edge weights are given by a symmetric function of the endpoints.
/// Every pair of distinct nodes is connected; no adjacency is stored.
pub trait MetricGraph: GraphNodeOrder {
    /// Returns the weight of the edge {u, v}; zero for u == v.
    /// ** Panics if u, v >= n **
    fn weight(&self, u: Node, v: Node) -> Weight;

    /// Iterates over all n(n-1)/2 edges {u, v} with u < v in lexicographic order
    fn weighted_edges(&self) -> impl Iterator<Item = WeightedEdge> + '_ {
        let n = self.number_of_nodes();
        (0..n).flat_map(move |u| {
            (u + 1..n).map(move |v| WeightedEdge::new(Edge(u, v), self.weight(u, v)))
        })
    }

    /// Sum of the weights of the given edges
    fn total_weight<'a>(&self, edges: impl IntoIterator<Item = &'a Edge>) -> Weight {
        edges.into_iter().map(|&Edge(u, v)| self.weight(u, v)).sum()
    }
}
