//! Blossom Algorithm Framework
//! Shared algorithm vocabulary and the graph matching solvers

pub mod traits;
pub mod graph;

pub use self::traits::*;
pub use self::graph::*;
