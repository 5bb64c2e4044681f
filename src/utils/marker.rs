use crate::graph::{Node, NumNodes};

/// Per-node marks with a distinguished default value, e.g. visited flags or parent pointers
#[derive(Clone, Default, Debug)]
pub struct Marker<T: Clone + Eq> {
    data: Vec<T>,
    default: T,
}

pub type NodeMarker = Marker<bool>;

impl<T: Clone + Eq> Marker<T> {
    #[inline(always)]
    pub fn new(n: NumNodes, default: T) -> Self {
        Marker {
            data: vec![default.clone(); n as usize],
            default,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> NumNodes {
        self.data.len() as NumNodes
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|i| *i = self.default.clone());
    }

    #[inline(always)]
    pub fn get_mark(&self, index: Node) -> T {
        self.data[index as usize].clone()
    }

    #[inline(always)]
    pub fn is_marked(&self, index: Node) -> bool {
        self.data[index as usize] != self.default
    }

    #[inline(always)]
    pub fn mark_with(&mut self, index: Node, marker: T) {
        self.data[index as usize] = marker;
    }

    /// Number of entries differing from the default
    pub fn number_of_marked(&self) -> NumNodes {
        self.data.iter().filter(|x| **x != self.default).count() as NumNodes
    }
}

impl Marker<bool> {
    /// Marks `index` and returns true iff it was unmarked before
    #[inline(always)]
    pub fn try_mark(&mut self, index: Node) -> bool {
        !std::mem::replace(&mut self.data[index as usize], true)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn node_marker() {
        let mut marker = NodeMarker::new(4, false);
        assert!(marker.try_mark(2));
        assert!(!marker.try_mark(2));
        assert!(marker.is_marked(2));
        assert!(!marker.is_marked(1));
        assert_eq!(marker.number_of_marked(), 1);

        marker.reset();
        assert_eq!(marker.number_of_marked(), 0);
        assert_eq!(marker.len(), 4);
    }
}
