use super::*;
use crate::errors::{Result, TspError};
use fxhash::FxHashMap;

/// Complete undirected graph over cities in the plane. The weight of the edge {u, v} is the
/// Euclidean distance between the positions of u and v; it is computed on demand, so the
/// graph uses O(n) memory.
///
/// Nodes are numbered `0..n` in increasing order of the external id of each city (as written
/// in the instance file), which is kept as its label.
#[derive(Clone, Debug)]
pub struct CompleteGraph {
    labels: Vec<VertexId>,
    positions: Vec<Point>,
    node_of_label: FxHashMap<VertexId, Node>,
}

impl CompleteGraph {
    /// Builds the complete graph over the given cities.
    ///
    /// Fails with [`TspError::MalformedInput`] if fewer than two cities are given, if an id
    /// occurs twice, or if a coordinate is not finite.
    ///
    /// # Example
    /// ```
    /// use metric_tsp::graph::*;
    /// let graph = CompleteGraph::try_from_vertices([(1, 0.0, 0.0), (2, 3.0, 4.0)]).unwrap();
    /// assert_eq!(graph.number_of_nodes(), 2);
    /// assert_eq!(graph.weight(0, 1), 5.0);
    /// assert_eq!(graph.label_of(1), 2);
    /// ```
    pub fn try_from_vertices<V: Into<Vertex>>(vertices: impl IntoIterator<Item = V>) -> Result<Self> {
        let mut vertices: Vec<Vertex> = vertices.into_iter().map(|v| v.into()).collect();

        if let Some(Vertex { id, position }) = vertices.iter().find(|v| !v.position.is_finite()) {
            return Err(TspError::MalformedInput(format!(
                "vertex {id} has non-finite coordinates ({}, {})",
                position.x, position.y
            )));
        }

        // node 0 is the lowest id; neighbours are scanned in id order
        vertices.sort_by_key(|v| v.id);

        let mut labels = Vec::with_capacity(vertices.len());
        let mut positions = Vec::with_capacity(vertices.len());
        let mut node_of_label = FxHashMap::default();
        node_of_label.reserve(vertices.len());

        for Vertex { id, position } in vertices {
            let node = labels.len() as Node;
            if node_of_label.insert(id, node).is_some() {
                return Err(TspError::MalformedInput(format!("duplicate vertex id {id}")));
            }

            labels.push(id);
            positions.push(position);
        }

        if labels.len() < 2 {
            return Err(TspError::MalformedInput(format!(
                "a tour requires at least 2 vertices, got {}",
                labels.len()
            )));
        }

        if labels.len() > Node::MAX as usize {
            return Err(TspError::MalformedInput(format!(
                "too many vertices: {}",
                labels.len()
            )));
        }

        Ok(Self {
            labels,
            positions,
            node_of_label,
        })
    }

    /// Builds the graph with labels `1..=n`, mirroring TSPLIB numbering
    pub fn try_from_points(points: impl IntoIterator<Item = Point>) -> Result<Self> {
        Self::try_from_vertices(
            points
                .into_iter()
                .zip(1..)
                .map(|(position, id)| Vertex { id, position }),
        )
    }

    /// Returns the external id of node `u`
    pub fn label_of(&self, u: Node) -> VertexId {
        self.labels[u as usize]
    }

    /// Returns the node with external id `label`, if any
    pub fn node_of(&self, label: VertexId) -> Option<Node> {
        self.node_of_label.get(&label).copied()
    }

    pub fn labels(&self) -> &[VertexId] {
        &self.labels
    }

    pub fn position_of(&self, u: Node) -> Point {
        self.positions[u as usize]
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Returns all cities with their external ids in node order
    pub fn vertices_with_labels(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.labels
            .iter()
            .zip(&self.positions)
            .map(|(&id, &position)| Vertex { id, position })
    }
}

impl GraphNodeOrder for CompleteGraph {
    fn number_of_nodes(&self) -> NumNodes {
        self.labels.len() as NumNodes
    }
}

impl GraphEdgeOrder for CompleteGraph {
    fn number_of_edges(&self) -> NumEdges {
        let n = self.number_of_nodes() as NumEdges;
        n * (n - 1) / 2
    }
}

impl MetricGraph for CompleteGraph {
    fn weight(&self, u: Node, v: Node) -> Weight {
        self.positions[u as usize].distance_to(&self.positions[v as usize])
    }
}

/// View of a [`MetricGraph`] restricted to a subset of its nodes. The subset is relabelled
/// densely in the order it was given; the weights are those of the parent graph.
#[derive(Clone, Debug)]
pub struct InducedSubgraph<'a, G: MetricGraph> {
    parent: &'a G,
    mapper: NodeMapper,
}

pub trait InducedSubgraphs: MetricGraph + Sized {
    /// Returns the subgraph induced by `nodes`. Repeated nodes are only taken once.
    /// ** Panics if a node is not in the graph **
    fn induced_subgraph(&self, nodes: &[Node]) -> InducedSubgraph<'_, Self> {
        let mapper: NodeMapper = nodes.iter().copied().collect();
        assert!(
            mapper
                .old_ids()
                .iter()
                .all(|&u| u < self.number_of_nodes())
        );
        InducedSubgraph {
            parent: self,
            mapper,
        }
    }
}

impl<G: MetricGraph> InducedSubgraphs for G {}

impl<'a, G: MetricGraph> InducedSubgraph<'a, G> {
    pub fn parent(&self) -> &'a G {
        self.parent
    }

    pub fn mapper(&self) -> &NodeMapper {
        &self.mapper
    }

    /// Translates a node of the subgraph into the parent's id
    pub fn parent_node_of(&self, u: Node) -> Node {
        self.mapper.old_ids()[u as usize]
    }
}

impl<G: MetricGraph> GraphNodeOrder for InducedSubgraph<'_, G> {
    fn number_of_nodes(&self) -> NumNodes {
        self.mapper.len()
    }
}

impl<G: MetricGraph> MetricGraph for InducedSubgraph<'_, G> {
    fn weight(&self, u: Node, v: Node) -> Weight {
        self.parent
            .weight(self.parent_node_of(u), self.parent_node_of(v))
    }
}
