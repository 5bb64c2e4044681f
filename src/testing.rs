use super::{graph::*, utils::UnionFind};
use itertools::Itertools as _;
use rand::Rng;

/// Uniform random instance in a 100 x 100 box
pub fn random_graph(rng: &mut impl Rng, n: NumNodes) -> CompleteGraph {
    CompleteGraph::random_uniform(rng, n, 100.0).unwrap()
}

/// Asserts that two costs agree up to a relative error of 1e-9
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * actual.abs().max(expected.abs()).max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Asserts that `tour` visits each of the `n` nodes exactly once and then returns to its start
pub fn assert_hamiltonian(tour: &[Node], n: NumNodes) {
    assert_eq!(tour.len(), n as usize + 1, "tour: {tour:?}");
    assert_eq!(tour.first(), tour.last(), "tour: {tour:?}");

    let mut open = tour[..n as usize].to_vec();
    open.sort_unstable();
    assert_eq!(open, (0..n).collect_vec(), "tour: {tour:?}");
}

/// Weight of a minimum spanning tree by trying all (n-1)-subsets of edges; only for tiny graphs
pub fn brute_force_mst_weight(graph: &impl MetricGraph) -> Weight {
    let n = graph.number_of_nodes();
    graph
        .weighted_edges()
        .combinations(n as usize - 1)
        .filter(|edges| {
            let mut components = UnionFind::new(n);
            edges.iter().all(|e| components.union(e.edge.0, e.edge.1))
        })
        .map(|edges| edges.iter().map(|e| e.weight).sum::<Weight>())
        .fold(Weight::INFINITY, Weight::min)
}

/// Weight of a minimum weight perfect matching by exhaustive search; only for tiny graphs
pub fn brute_force_perfect_matching_weight(graph: &impl MetricGraph) -> Weight {
    fn recurse(graph: &impl MetricGraph, unmatched: &mut Vec<Node>) -> Weight {
        let Some(u) = unmatched.pop() else {
            return 0.0;
        };

        let mut best = Weight::INFINITY;
        for i in 0..unmatched.len() {
            let v = unmatched.swap_remove(i);
            best = best.min(graph.weight(u, v) + recurse(graph, unmatched));
            unmatched.push(v);
            let last = unmatched.len() - 1;
            unmatched.swap(i, last);
        }

        unmatched.push(u);
        best
    }

    assert!(graph.number_of_nodes() % 2 == 0);
    recurse(graph, &mut graph.vertices().collect_vec())
}

/// Length of an optimal tour computed with the Held-Karp dynamic program; only for n <= 12
pub fn optimal_tour_cost(graph: &impl MetricGraph) -> Weight {
    let n = graph.len();
    assert!((2..=12).contains(&n));

    // best[set][v]: shortest path starting at node 0, visiting `set` (subset of 1..n) and
    // ending at v in set; sets are bitmasks over nodes 1..n shifted down by one
    let sets = 1usize << (n - 1);
    let mut best = vec![vec![Weight::INFINITY; n]; sets];
    for v in 1..n {
        best[1 << (v - 1)][v] = graph.weight(0, v as Node);
    }

    for set in 1..sets {
        for v in 1..n {
            if set & (1 << (v - 1)) == 0 || !best[set][v].is_finite() {
                continue;
            }
            for w in 1..n {
                if set & (1 << (w - 1)) != 0 {
                    continue;
                }
                let next = set | (1 << (w - 1));
                let candidate = best[set][v] + graph.weight(v as Node, w as Node);
                if candidate < best[next][w] {
                    best[next][w] = candidate;
                }
            }
        }
    }

    (1..n)
        .map(|v| best[sets - 1][v] + graph.weight(v as Node, 0))
        .fold(Weight::INFINITY, Weight::min)
}

#[test]
fn held_karp_on_square() {
    let graph = CompleteGraph::try_from_points([
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
        Point::new(1.0, 0.0),
    ])
    .unwrap();
    assert_close(optimal_tour_cost(&graph), 4.0);
    assert_close(brute_force_perfect_matching_weight(&graph), 2.0);
    assert_close(brute_force_mst_weight(&graph), 3.0);
}
