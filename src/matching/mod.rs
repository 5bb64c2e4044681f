//! Minimum weight perfect matchings on complete metric graphs.
//!
//! The matcher reduces to maximum weight maximum cardinality matching: each weight `w` is
//! quantised to a fixed-point integer `q(w)` and replaced by `q_max + 1 - q(w)`. On a complete
//! graph with an even number of nodes every maximum cardinality matching is perfect, and among
//! those the transformed objective is maximal exactly when the original weight is minimal.

pub mod blossom;

use itertools::Itertools;
use log::{debug, trace};

use crate::{
    algorithm::{Interrupt, Phase},
    errors::{InvariantCheck, Result, TspError},
    graph::*,
};

use blossom::{IntWeight, maximum_weight_matching};

/// Exponent of the largest quantised weight
const QUANTISATION_BITS: i32 = 50;

/// A set of vertex-disjoint edges over the nodes `0..n`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    number_of_nodes: NumNodes,
    pairs: Vec<Edge>,
}

impl Matching {
    /// Builds a matching from (normalized) pairs; use [`InvariantCheck::is_correct`] to verify
    /// it is perfect
    pub fn new(number_of_nodes: NumNodes, pairs: impl IntoIterator<Item = Edge>) -> Self {
        let mut pairs = pairs.into_iter().map(|e| e.normalized()).collect_vec();
        pairs.sort_unstable();
        Self {
            number_of_nodes,
            pairs,
        }
    }

    pub fn pairs(&self) -> &[Edge] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn total_weight<G: MetricGraph>(&self, graph: &G) -> Weight {
        graph.total_weight(&self.pairs)
    }

    /// Translates the pairs of a matching on an induced subgraph back to the parent's nodes
    pub fn lift<G: MetricGraph>(&self, subgraph: &InducedSubgraph<'_, G>) -> Vec<Edge> {
        self.pairs
            .iter()
            .map(|&Edge(u, v)| Edge(subgraph.parent_node_of(u), subgraph.parent_node_of(v)))
            .collect()
    }
}

impl InvariantCheck<TspError> for Matching {
    /// Every node is covered by exactly one pair
    fn is_correct(&self) -> Result<()> {
        let mut covered = vec![false; self.number_of_nodes as usize];
        for &Edge(u, v) in &self.pairs {
            for x in [u, v] {
                if x >= self.number_of_nodes {
                    return Err(TspError::MatchingFailure(format!(
                        "matched node {x} out of range"
                    )));
                }
                if std::mem::replace(&mut covered[x as usize], true) {
                    return Err(TspError::MatchingFailure(format!(
                        "node {x} is matched twice"
                    )));
                }
            }
        }

        if let Some(u) = covered.iter().position(|&c| !c) {
            return Err(TspError::MatchingFailure(format!("node {u} is unmatched")));
        }

        Ok(())
    }
}

/// Returns the odd-degree vertices of `graph` in increasing order. By the handshake lemma
/// there is an even number of them; an odd count indicates a corrupted graph.
pub fn odd_degree_vertices<G: AdjacencyList>(graph: &G) -> Result<Vec<Node>> {
    let odd = graph.odd_degree_vertices();
    if odd.len() % 2 == 1 {
        return Err(TspError::MatchingFailure(format!(
            "found an odd number ({}) of odd-degree vertices",
            odd.len()
        )));
    }
    trace!("{} odd-degree vertices", odd.len());
    Ok(odd)
}

/// Maps non-negative weights onto an integer grid such that the largest weight becomes about
/// 2^50. Returns the scale factor; fails if a weight is negative or not finite.
fn quantisation_scale(max_weight: Weight) -> Result<f64> {
    if !max_weight.is_finite() || max_weight < 0.0 {
        return Err(TspError::MatchingFailure(format!(
            "cannot match edges of weight {max_weight}"
        )));
    }

    if max_weight == 0.0 {
        return Ok(1.0);
    }

    let exponent = QUANTISATION_BITS - max_weight.log2().ceil() as i32;
    Ok(2f64.powi(exponent.clamp(f64::MIN_EXP, f64::MAX_EXP - 1)))
}

/// Computes a minimum weight perfect matching of the complete graph `graph`.
///
/// Fails with [`TspError::MatchingFailure`] if the number of nodes is odd, if some weight is
/// not finite, or if the result does not cover every node exactly once. Returns
/// [`TspError::Timeout`] if `interrupt` fires during the computation.
pub fn minimum_weight_perfect_matching<G: MetricGraph>(
    graph: &G,
    interrupt: &impl Interrupt,
) -> Result<Matching> {
    let n = graph.number_of_nodes();
    if n % 2 == 1 {
        return Err(TspError::MatchingFailure(format!(
            "no perfect matching on {n} nodes"
        )));
    }

    let weighted = graph.weighted_edges().collect_vec();
    let max_weight = weighted.iter().map(|e| e.weight).fold(0.0, Weight::max);
    if weighted.iter().any(|e| !e.weight.is_finite()) {
        return Err(TspError::MatchingFailure(
            "cannot match edges of non-finite weight".into(),
        ));
    }

    let scale = quantisation_scale(max_weight)?;
    let quantised = weighted
        .iter()
        .map(|e| (e.edge, (e.weight * scale).round() as IntWeight))
        .collect_vec();
    let max_quantised = quantised.iter().map(|&(_, w)| w).max().unwrap_or(0);

    let transformed = quantised
        .iter()
        .map(|&(Edge(u, v), w)| (u, v, max_quantised + 1 - w))
        .collect_vec();

    let mate = maximum_weight_matching(n as usize, &transformed, true, interrupt)?;

    let matching = Matching::new(
        n,
        mate.iter()
            .enumerate()
            .filter_map(|(u, &m)| m.filter(|&v| (u as Node) < v).map(|v| Edge(u as Node, v))),
    );
    matching.is_correct()?;

    debug!(
        "perfect matching of {} pairs with weight {:.4}",
        matching.len(),
        matching.total_weight(graph)
    );

    Ok(matching)
}

/// Computes a minimum weight perfect matching on the odd-degree vertices of `tree` within
/// `graph`, with the pairs expressed in the node ids of `graph`
pub fn match_odd_vertices<G: MetricGraph, T: AdjacencyList>(
    graph: &G,
    tree: &T,
    interrupt: &impl Interrupt,
) -> Result<Vec<Edge>> {
    let odd = odd_degree_vertices(tree)?;
    interrupt.check(Phase::Matching)?;

    let subgraph = graph.induced_subgraph(&odd);
    let matching = minimum_weight_perfect_matching(&subgraph, interrupt)?;
    Ok(matching.lift(&subgraph))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{algorithm::Never, testing::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn matches_unit_square_along_sides() {
        let graph = CompleteGraph::try_from_vertices([
            (1, 0.0, 0.0),
            (2, 0.0, 1.0),
            (3, 1.0, 1.0),
            (4, 1.0, 0.0),
        ])
        .unwrap();

        let matching = minimum_weight_perfect_matching(&graph, &Never).unwrap();
        assert_eq!(matching.len(), 2);
        assert_close(matching.total_weight(&graph), 2.0);
    }

    #[test]
    fn optimal_on_random_instances() {
        let mut rng = Pcg64::seed_from_u64(0xdead);
        for n in [2, 4, 6, 8, 10] {
            for _ in 0..10 {
                let graph = random_graph(&mut rng, n);
                let matching = minimum_weight_perfect_matching(&graph, &Never).unwrap();
                matching.is_correct().unwrap();
                assert_close(
                    matching.total_weight(&graph),
                    brute_force_perfect_matching_weight(&graph),
                );
            }
        }
    }

    #[test]
    fn zero_weights() {
        let graph =
            CompleteGraph::try_from_vertices((1..=4).map(|i| (i, 3.0, 3.0))).unwrap();
        let matching = minimum_weight_perfect_matching(&graph, &Never).unwrap();
        matching.is_correct().unwrap();
        assert_eq!(matching.total_weight(&graph), 0.0);
    }

    #[test]
    fn odd_node_count_fails() {
        let graph = random_graph(&mut Pcg64::seed_from_u64(3), 5);
        assert!(matches!(
            minimum_weight_perfect_matching(&graph, &Never),
            Err(TspError::MatchingFailure(_))
        ));
    }

    #[test]
    fn invariant_check() {
        assert!(Matching::new(4, [Edge(0, 1), Edge(3, 2)]).is_correct().is_ok());
        assert!(Matching::new(4, [Edge(0, 1)]).is_correct().is_err());
        assert!(Matching::new(4, [Edge(0, 1), Edge(1, 2)]).is_correct().is_err());
        assert!(Matching::new(2, [Edge(0, 5)]).is_correct().is_err());
    }

    #[test]
    fn lifted_pairs_cover_odd_vertices() {
        let mut rng = Pcg64::seed_from_u64(17);
        let graph = random_graph(&mut rng, 40);
        let tree = crate::tree::prim(&graph).unwrap();

        let odd = odd_degree_vertices(&tree).unwrap();
        let pairs = match_odd_vertices(&graph, &tree, &Never).unwrap();

        let mut covered = pairs.iter().flat_map(|&Edge(u, v)| [u, v]).collect_vec();
        covered.sort_unstable();
        assert_eq!(covered, odd);
    }

    #[test]
    fn quantisation() {
        assert_eq!(quantisation_scale(0.0).unwrap(), 1.0);
        assert_eq!(quantisation_scale(1.0).unwrap(), 2f64.powi(50));
        assert_eq!(quantisation_scale(1000.0).unwrap(), 2f64.powi(40));
        assert!(quantisation_scale(f64::INFINITY).is_err());
    }
}
