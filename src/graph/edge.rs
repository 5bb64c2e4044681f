use super::*;
use std::cmp::Ordering;

pub trait EdgeOps {
    fn normalized(&self) -> Self;
    fn is_normalized(&self) -> bool;
    fn is_loop(&self) -> bool;
    fn reverse(&self) -> Self;
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Edge(pub Node, pub Node);

impl Edge {
    /// Returns the endpoint opposite to `u`.
    /// ** Panics in debug builds if `u` is not an endpoint **
    pub fn other(&self, u: Node) -> Node {
        debug_assert!(self.0 == u || self.1 == u);
        if self.0 == u { self.1 } else { self.0 }
    }

    pub fn contains(&self, u: Node) -> bool {
        self.0 == u || self.1 == u
    }
}

impl EdgeOps for Edge {
    fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

/// An edge together with its weight. Ordered by weight first and then by the (normalized)
/// endpoints, which gives a total and deterministic order even for equal weights.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WeightedEdge {
    pub edge: Edge,
    pub weight: Weight,
}

impl WeightedEdge {
    pub fn new(edge: Edge, weight: Weight) -> Self {
        Self { edge, weight }
    }

    pub fn cmp_by_weight(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.edge.normalized().cmp(&other.edge.normalized()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edge_ops() {
        let e = Edge(3, 1);
        assert!(!e.is_normalized());
        assert_eq!(e.normalized(), Edge(1, 3));
        assert_eq!(e.reverse(), Edge(1, 3));
        assert_eq!(e.other(3), 1);
        assert_eq!(e.other(1), 3);
        assert!(!e.is_loop());
        assert!(Edge(2, 2).is_loop());
    }

    #[test]
    fn weighted_edge_order_breaks_ties_by_endpoints() {
        let mut edges = vec![
            WeightedEdge::new(Edge(2, 3), 1.0),
            WeightedEdge::new(Edge(1, 0), 1.0),
            WeightedEdge::new(Edge(0, 4), 0.5),
        ];
        edges.sort_by(WeightedEdge::cmp_by_weight);
        assert_eq!(
            edges.iter().map(|e| e.edge).collect::<Vec<_>>(),
            vec![Edge(0, 4), Edge(1, 0), Edge(2, 3)]
        );
    }
}
