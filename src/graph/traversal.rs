use super::*;
use crate::utils::NodeMarker;

pub trait TraversalState {
    fn visited(&self) -> &NodeMarker;

    fn did_visit_node(&self, u: Node) -> bool {
        self.visited().is_marked(u)
    }
}

////////////////////////////////////////////////////////////////////////////////////////// DFS
/// Depth-first search yielding every reachable node exactly once, in preorder. Neighbors are
/// explored in increasing id order, so the traversal is fully determined by the graph and
/// the start node (parallel edges do not matter).
pub struct DfsPreorder<'a, G: AdjacencyList> {
    graph: &'a G,
    visited: NodeMarker,
    stack: Vec<Node>,
    scratch: Vec<Node>,
}

impl<'a, G: AdjacencyList> TraversalState for DfsPreorder<'a, G> {
    fn visited(&self) -> &NodeMarker {
        &self.visited
    }
}

impl<'a, G: AdjacencyList> Iterator for DfsPreorder<'a, G> {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let u = self.stack.pop()?;
            if !self.visited.try_mark(u) {
                continue; // reached earlier via another path
            }

            self.scratch.clear();
            self.scratch.extend(
                self.graph
                    .neighbors_of(u)
                    .iter()
                    .copied()
                    .filter(|&v| !self.visited.is_marked(v)),
            );
            // largest on the bottom, so the smallest neighbor is explored first
            self.scratch.sort_unstable_by(|a, b| b.cmp(a));
            self.scratch.dedup();
            self.stack.extend_from_slice(&self.scratch);

            return Some(u);
        }
    }
}

impl<'a, G: AdjacencyList> DfsPreorder<'a, G> {
    pub fn new(graph: &'a G, start: Node) -> Self {
        Self {
            graph,
            visited: NodeMarker::new(graph.number_of_nodes(), false),
            stack: vec![start],
            scratch: Vec::new(),
        }
    }
}

pub trait Traversal: AdjacencyList {
    fn dfs_preorder(&self, start: Node) -> DfsPreorder<'_, Self> {
        DfsPreorder::new(self, start)
    }

    /// Returns true iff every node can be reached from node 0 (vacuously true if empty)
    fn is_connected(&self) -> bool {
        self.is_empty() || self.dfs_preorder(0).count() == self.len()
    }
}

impl<G: AdjacencyList> Traversal for G {}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn preorder_on_tree() {
        //      0
        //    / | \
        //   4  1  2
        //      |   \
        //      3    5
        let tree = MultiGraph::from_edges(6, [(0, 4), (0, 2), (2, 5), (1, 0), (3, 1)]);
        assert_eq!(tree.dfs_preorder(0).collect_vec(), vec![0, 1, 3, 2, 5, 4]);
        assert_eq!(tree.dfs_preorder(5).collect_vec(), vec![5, 2, 0, 1, 3, 4]);
        assert!(tree.is_connected());
    }

    #[test]
    fn preorder_with_cycles_and_parallel_edges() {
        let graph = MultiGraph::from_edges(4, [(0, 1), (1, 2), (2, 0), (0, 1), (2, 3)]);
        let order = graph.dfs_preorder(0).collect_vec();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn disconnected() {
        let graph = MultiGraph::from_edges(4, [(0, 1), (2, 3)]);
        let mut dfs = graph.dfs_preorder(0);
        assert_eq!(dfs.by_ref().collect_vec(), vec![0, 1]);
        assert!(dfs.did_visit_node(1));
        assert!(!dfs.did_visit_node(2));
        assert!(!graph.is_connected());
    }
}
