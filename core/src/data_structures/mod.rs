//! Graph, matching and alternating-forest representations

pub mod forest;
pub mod graph;
pub mod matching;

pub use self::forest::AlternatingForest;
pub use self::graph::{AdjacencyCell, Graph};
pub use self::matching::Matching;
