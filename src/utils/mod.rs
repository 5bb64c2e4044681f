pub mod marker;
pub mod memory;
pub mod signal_handling;
pub mod union_find;

pub use marker::*;
pub use union_find::UnionFind;
