use fxhash::FxHashMap;

use super::{Node, NumNodes};

/// Bidirectional mapping between the node ids of a graph and those of a derived graph
/// (e.g. an induced subgraph with dense relabelled ids).
#[derive(Clone, Debug, Default)]
pub struct NodeMapper {
    new_to_old: Vec<Node>,
    old_to_new: FxHashMap<Node, Node>,
}

impl NodeMapper {
    pub fn with_capacity(n: NumNodes) -> Self {
        let mut old_to_new = FxHashMap::default();
        old_to_new.reserve(n as usize);
        Self {
            new_to_old: Vec::with_capacity(n as usize),
            old_to_new,
        }
    }

    /// Assigns the next dense id to `old` and returns it. Mapping an already mapped node
    /// returns the existing id.
    pub fn push(&mut self, old: Node) -> Node {
        let next = self.new_to_old.len() as Node;
        let new = *self.old_to_new.entry(old).or_insert(next);
        if new == next {
            self.new_to_old.push(old);
        }
        new
    }

    pub fn new_id_of(&self, old: Node) -> Option<Node> {
        self.old_to_new.get(&old).copied()
    }

    pub fn old_id_of(&self, new: Node) -> Option<Node> {
        self.new_to_old.get(new as usize).copied()
    }

    /// Number of mapped nodes
    pub fn len(&self) -> NumNodes {
        self.new_to_old.len() as NumNodes
    }

    pub fn is_empty(&self) -> bool {
        self.new_to_old.is_empty()
    }

    /// Old ids in the order of their new ids
    pub fn old_ids(&self) -> &[Node] {
        &self.new_to_old
    }
}

impl FromIterator<Node> for NodeMapper {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        let mut mapper = NodeMapper::default();
        for u in iter {
            mapper.push(u);
        }
        mapper
    }
}
