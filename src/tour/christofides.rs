use log::debug;

use super::{eulerian::*, *};
use crate::matching::match_odd_vertices;

/// Christofides 3/2-approximation with the default spanning tree algorithm
pub fn christofides_tour<G: MetricGraph>(
    graph: &G,
    interrupt: &impl Interrupt,
) -> Result<TourResult> {
    christofides_tour_with_mst(graph, MstAlgorithm::default(), interrupt)
}

/// Christofides' algorithm:
///  1. compute a minimum spanning tree,
///  2. match its odd-degree vertices with minimum total weight,
///  3. walk an Eulerian circuit of the union (rooted at node 0, the lowest id),
///  4. skip nodes already visited and close the cycle.
pub fn christofides_tour_with_mst<G: MetricGraph>(
    graph: &G,
    mst: MstAlgorithm,
    interrupt: &impl Interrupt,
) -> Result<TourResult> {
    let n = graph.number_of_nodes();

    interrupt.check(Phase::SpanningTree)?;
    let tree = minimum_spanning_tree(graph, mst)?;

    interrupt.check(Phase::OddVertices)?;
    let pairs = match_odd_vertices(graph, &tree, interrupt)?;

    interrupt.check(Phase::EulerianCircuit)?;
    let mut multigraph = tree.into_multigraph();
    multigraph.add_edges(pairs);
    ensure_even_degrees(&multigraph)?;

    let circuit = eulerian_circuit(&multigraph, 0)?;
    debug!(
        "eulerian circuit over {} edges of the combined multigraph",
        circuit.len() - 1
    );

    interrupt.check(Phase::Shortcutting)?;
    TourResult::evaluate(graph, shortcut(&circuit, n))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{algorithm::Never, testing::*};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn combined_multigraph_is_eulerian() {
        let mut rng = Pcg64::seed_from_u64(0xc4);
        for n in [2, 3, 7, 30] {
            let graph = random_graph(&mut rng, n);
            let tree = minimum_spanning_tree(&graph, MstAlgorithm::Prim).unwrap();
            let pairs = match_odd_vertices(&graph, &tree, &Never).unwrap();

            let mut multigraph = tree.into_multigraph();
            multigraph.add_edges(pairs);
            assert!(multigraph.degrees().all(|d| d % 2 == 0));
            assert!(multigraph.is_connected());
        }
    }

    #[test]
    fn pentagon_is_optimal() {
        let graph = CompleteGraph::try_from_points((0..5).map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / 5.0;
            Point::new(angle.cos(), angle.sin())
        }))
        .unwrap();

        let result = christofides_tour(&graph, &Never).unwrap();
        assert_hamiltonian(result.tour.nodes(), 5);
        assert_close(result.cost, optimal_tour_cost(&graph));
    }
}
