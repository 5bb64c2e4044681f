pub mod algorithm;
pub mod bench;
pub mod errors;
pub mod graph;
pub mod io;
pub mod log;
pub mod matching;
pub mod tour;
pub mod tree;
pub mod utils;

pub mod prelude {
    pub use super::algorithm::*;
    pub use super::errors::{InvariantCheck, TspError};
    pub use super::graph::*;
    pub use super::io::*;
    pub use super::matching::{Matching, minimum_weight_perfect_matching};
    pub use super::tour::*;
    pub use super::tree::*;
}

#[cfg(test)]
mod testing;
