use super::*;
use smallvec::SmallVec;

type Neighborhood<T> = SmallVec<[T; 4]>;

/// Undirected multigraph over the nodes `0..n` with stable edge ids. Parallel edges are
/// allowed; self-loops are not. Used for spanning trees and the Christofides multigraph.
///
/// For each node, `neighbors[u][i]` is the far endpoint of the edge `incident[u][i]`; both
/// lists are kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MultiGraph {
    neighbors: Vec<Neighborhood<Node>>,
    incident: Vec<Neighborhood<EdgeId>>,
    edges: Vec<Edge>,
}

impl MultiGraph {
    /// Creates an empty graph with n singleton nodes
    pub fn new(n: NumNodes) -> Self {
        Self {
            neighbors: vec![Default::default(); n as usize],
            incident: vec![Default::default(); n as usize],
            edges: Vec::new(),
        }
    }

    /// Adds the undirected edge {u, v} and returns its id. Adding an existing edge again
    /// creates a parallel edge.
    /// ** Panics if u == v or u, v >= n **
    pub fn add_edge(&mut self, u: Node, v: Node) -> EdgeId {
        assert_ne!(u, v, "self-loops are not supported");
        let id = self.edges.len() as EdgeId;
        self.edges.push(Edge(u, v));

        self.neighbors[u as usize].push(v);
        self.incident[u as usize].push(id);
        self.neighbors[v as usize].push(u);
        self.incident[v as usize].push(id);

        id
    }

    pub fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge>>) {
        for Edge(u, v) in edges.into_iter().map(|e| e.into()) {
            self.add_edge(u, v);
        }
    }

    pub fn from_edges(n: NumNodes, edges: impl IntoIterator<Item = impl Into<Edge>>) -> Self {
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }

    /// Returns the edge with the given id
    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id as usize]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Ids of the edges incident to `u`, aligned with [`AdjacencyList::neighbors_of`]
    pub fn incident_edges_of(&self, u: Node) -> &[EdgeId] {
        &self.incident[u as usize]
    }

    /// Number of edges between `u` and `v`
    pub fn multiplicity(&self, u: Node, v: Node) -> usize {
        self.neighbors_of(u).iter().filter(|&&w| w == v).count()
    }
}

impl GraphNodeOrder for MultiGraph {
    fn number_of_nodes(&self) -> NumNodes {
        self.neighbors.len() as NumNodes
    }
}

impl GraphEdgeOrder for MultiGraph {
    fn number_of_edges(&self) -> NumEdges {
        self.edges.len() as NumEdges
    }
}

impl AdjacencyList for MultiGraph {
    fn neighbors_of(&self, u: Node) -> &[Node] {
        &self.neighbors[u as usize]
    }
}
