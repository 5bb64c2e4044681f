//! Tours and the two approximation algorithms producing them.

pub mod christofides;
pub mod eulerian;
pub mod twice_around;

use std::{fmt, str::FromStr, time::Duration};

use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::{
    algorithm::{Deadline, Interrupt, Never, Phase},
    errors::{InvariantCheck, Result, TspError},
    graph::*,
    tree::{MstAlgorithm, minimum_spanning_tree},
    utils::NodeMarker,
};

pub use christofides::{christofides_tour, christofides_tour_with_mst};
pub use twice_around::{twice_around_tour, twice_around_tour_with_mst};

/// A Hamiltonian cycle over the nodes `0..n`, stored as the closed sequence
/// `v_0, v_1, ..., v_{n-1}, v_0`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    number_of_nodes: NumNodes,
    nodes: Vec<Node>,
}

impl Tour {
    /// Fails with [`TspError::InvalidTour`] unless `nodes` visits each of the
    /// `number_of_nodes` nodes exactly once and then returns to its first node
    pub fn try_new(number_of_nodes: NumNodes, nodes: Vec<Node>) -> Result<Self> {
        let tour = Self {
            number_of_nodes,
            nodes,
        };
        tour.is_correct()?;
        Ok(tour)
    }

    /// The closed node sequence (of length n + 1)
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    /// Total weight of the cycle; infallible since the tour was validated on construction
    pub fn cost<G: MetricGraph>(&self, graph: &G) -> Weight {
        sum_of_legs(graph, &self.nodes)
    }

    /// The tour in terms of the ids given in the input
    pub fn labels(&self, graph: &CompleteGraph) -> Vec<VertexId> {
        self.nodes.iter().map(|&u| graph.label_of(u)).collect()
    }
}

impl InvariantCheck<TspError> for Tour {
    fn is_correct(&self) -> Result<()> {
        let n = self.number_of_nodes as usize;

        if self.nodes.len() != n + 1 {
            return Err(TspError::InvalidTour(format!(
                "expected {} entries for {n} nodes, got {}",
                n + 1,
                self.nodes.len()
            )));
        }

        if self.nodes.first() != self.nodes.last() {
            return Err(TspError::InvalidTour("tour is not closed".into()));
        }

        let mut visited = NodeMarker::new(self.number_of_nodes, false);
        for &u in &self.nodes[..n] {
            if u >= self.number_of_nodes {
                return Err(TspError::InvalidTour(format!("node {u} out of range")));
            }
            if !visited.try_mark(u) {
                return Err(TspError::InvalidTour(format!("node {u} visited twice")));
            }
        }

        Ok(())
    }
}

fn sum_of_legs<G: MetricGraph>(graph: &G, nodes: &[Node]) -> Weight {
    nodes
        .iter()
        .tuple_windows()
        .map(|(&u, &v)| graph.weight(u, v))
        .sum()
}

/// Sums the weights of consecutive legs of a closed node sequence.
///
/// Fails with [`TspError::MalformedInput`] if `tour` has fewer than two entries, does not
/// return to its first node, mentions a node outside the graph or stays at a node for a leg.
/// Repeated visits are not rejected; use [`Tour::try_new`] to check for a Hamiltonian cycle.
pub fn tour_cost<G: MetricGraph>(graph: &G, tour: &[Node]) -> Result<Weight> {
    if tour.len() < 2 {
        return Err(TspError::MalformedInput(format!(
            "a closed tour needs at least two entries, got {}",
            tour.len()
        )));
    }

    if tour.first() != tour.last() {
        return Err(TspError::MalformedInput(
            "tour does not return to its first node".into(),
        ));
    }

    if let Some(&u) = tour.iter().find(|&&u| u >= graph.number_of_nodes()) {
        return Err(TspError::MalformedInput(format!(
            "tour visits node {u}, but the graph has only {} nodes",
            graph.number_of_nodes()
        )));
    }

    if let Some((u, _)) = tour.iter().tuple_windows().find(|(u, v)| u == v) {
        return Err(TspError::MalformedInput(format!(
            "tour stays at node {u}; consecutive nodes must differ"
        )));
    }

    Ok(sum_of_legs(graph, tour))
}

/// Ratio of an achieved cost to the optimal cost; `None` if the optimum is not positive
pub fn approximation_ratio(cost: Weight, optimal: Weight) -> Option<f64> {
    (optimal > 0.0).then(|| cost / optimal)
}

#[derive(Clone, Debug)]
pub struct TourResult {
    pub tour: Tour,
    pub cost: Weight,
}

impl TourResult {
    /// Validates the closed node sequence and computes its cost
    pub(crate) fn evaluate<G: MetricGraph>(graph: &G, nodes: Vec<Node>) -> Result<Self> {
        let tour = Tour::try_new(graph.number_of_nodes(), nodes)?;
        let cost = tour.cost(graph);
        info!(
            "tour over {} nodes with cost {cost:.4}",
            tour.number_of_nodes()
        );
        Ok(Self { tour, cost })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize)]
pub enum TourAlgorithm {
    #[default]
    Christofides,
    #[serde(rename = "Twice around the tree")]
    TwiceAroundTheTree,
}

impl TourAlgorithm {
    pub const ALL: [TourAlgorithm; 2] = [
        TourAlgorithm::Christofides,
        TourAlgorithm::TwiceAroundTheTree,
    ];

    /// Runs the algorithm with the default spanning tree and without interruption
    pub fn solve<G: MetricGraph>(&self, graph: &G) -> Result<TourResult> {
        self.solve_with(graph, MstAlgorithm::default(), &Never)
    }

    pub fn solve_with<G: MetricGraph>(
        &self,
        graph: &G,
        mst: MstAlgorithm,
        interrupt: &impl Interrupt,
    ) -> Result<TourResult> {
        match self {
            TourAlgorithm::Christofides => christofides_tour_with_mst(graph, mst, interrupt),
            TourAlgorithm::TwiceAroundTheTree => twice_around_tour_with_mst(graph, mst, interrupt),
        }
    }
}

impl fmt::Display for TourAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourAlgorithm::Christofides => f.write_str("Christofides"),
            TourAlgorithm::TwiceAroundTheTree => f.write_str("Twice around the tree"),
        }
    }
}

impl FromStr for TourAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "christofides" => Ok(TourAlgorithm::Christofides),
            "twice-around" | "twice-around-the-tree" | "tatt" => {
                Ok(TourAlgorithm::TwiceAroundTheTree)
            }
            _ => Err(format!("unknown tour algorithm '{s}'")),
        }
    }
}

/// Selection of algorithms on the command line: a single one, or `both`/`all`
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AlgorithmChoice {
    One(TourAlgorithm),
    #[default]
    All,
}

impl AlgorithmChoice {
    pub fn algorithms(&self) -> Vec<TourAlgorithm> {
        match self {
            AlgorithmChoice::One(algorithm) => vec![*algorithm],
            AlgorithmChoice::All => TourAlgorithm::ALL.to_vec(),
        }
    }
}

impl FromStr for AlgorithmChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("both") || s.eq_ignore_ascii_case("all") {
            Ok(AlgorithmChoice::All)
        } else {
            s.parse().map(AlgorithmChoice::One)
        }
    }
}

/// Everything needed to run one algorithm on one instance
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverConfig {
    pub algorithm: TourAlgorithm,
    pub mst: MstAlgorithm,
    /// Wall-clock budget per run; unlimited if `None`
    pub timeout: Option<Duration>,
}

impl SolverConfig {
    pub fn new(algorithm: TourAlgorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    pub fn with_mst(mut self, mst: MstAlgorithm) -> Self {
        self.mst = mst;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the configured algorithm; stops early if `interrupt` fires or the timeout elapses
    pub fn run<G: MetricGraph>(&self, graph: &G, interrupt: &impl Interrupt) -> Result<TourResult> {
        let deadline = self.timeout.map(Deadline::new);
        self.algorithm
            .solve_with(graph, self.mst, &(interrupt, deadline))
    }
}
