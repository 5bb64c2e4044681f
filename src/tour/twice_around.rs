use itertools::Itertools;
use log::debug;

use super::*;

/// Twice-Around-the-Tree 2-approximation with the default spanning tree algorithm
pub fn twice_around_tour<G: MetricGraph>(
    graph: &G,
    interrupt: &impl Interrupt,
) -> Result<TourResult> {
    twice_around_tour_with_mst(graph, MstAlgorithm::default(), interrupt)
}

/// Visits the nodes in DFS preorder of a minimum spanning tree rooted at node 0, the city with
/// the lowest id (children in increasing id order), and returns to node 0. Walking the tree around costs twice its weight;
/// skipping repeated nodes never increases the cost in a metric graph.
pub fn twice_around_tour_with_mst<G: MetricGraph>(
    graph: &G,
    mst: MstAlgorithm,
    interrupt: &impl Interrupt,
) -> Result<TourResult> {
    interrupt.check(Phase::SpanningTree)?;
    let tree = minimum_spanning_tree(graph, mst)?;

    interrupt.check(Phase::Shortcutting)?;
    let mut nodes = tree.dfs_preorder(0).collect_vec();
    nodes.push(0);
    debug!("preorder walk visits {} nodes", nodes.len() - 1);

    TourResult::evaluate(graph, nodes)
}
