use crate::graph::{Node, NumNodes};

/// Disjoint-set forest with path compression and union by rank
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<Node>,
    rank: Vec<u8>,
    number_of_sets: NumNodes,
}

impl UnionFind {
    /// Creates `n` singleton sets `{0}, {1}, ..., {n-1}`
    pub fn new(n: NumNodes) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n as usize],
            number_of_sets: n,
        }
    }

    /// Returns the representative of the set containing `u`
    pub fn find(&mut self, u: Node) -> Node {
        let mut root = u;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut cur = u;
        while cur != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }

        root
    }

    /// Merges the sets of `u` and `v`; returns false iff they were already the same set
    pub fn union(&mut self, u: Node, v: Node) -> bool {
        let ru = self.find(u);
        let rv = self.find(v);
        if ru == rv {
            return false;
        }

        let (rank_u, rank_v) = (self.rank[ru as usize], self.rank[rv as usize]);
        if rank_u < rank_v {
            self.parent[ru as usize] = rv;
        } else {
            self.parent[rv as usize] = ru;
            if rank_u == rank_v {
                self.rank[ru as usize] += 1;
            }
        }

        self.number_of_sets -= 1;
        true
    }

    pub fn same_set(&mut self, u: Node, v: Node) -> bool {
        self.find(u) == self.find(v)
    }

    pub fn number_of_sets(&self) -> NumNodes {
        self.number_of_sets
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn union_and_find() {
        let mut uf = UnionFind::new(6);
        assert_eq!(uf.number_of_sets(), 6);

        assert!(uf.union(0, 1));
        assert!(uf.union(2, 3));
        assert!(uf.union(1, 3));
        assert!(!uf.union(0, 2));

        assert!(uf.same_set(0, 3));
        assert!(!uf.same_set(0, 4));
        assert_eq!(uf.number_of_sets(), 3);

        assert!(uf.union(4, 5));
        assert!(uf.union(5, 0));
        assert_eq!(uf.number_of_sets(), 1);
        let root = uf.find(0);
        assert!((0..6).all(|u| uf.find(u) == root));
    }
}
