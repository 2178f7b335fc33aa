//! Blossom Core
//!
//! Maximum-cardinality matching in general undirected graphs with Edmonds'
//! blossom algorithm, plus the trainer-pairing adapter built on top of it.
//!
//! ```
//! use blossom_core::{maximum_matching, Graph};
//!
//! let hexagon = Graph::from_edges(6, (0..6).map(|v| (v, (v + 1) % 6))).unwrap();
//! let matching = maximum_matching(&hexagon).unwrap();
//!
//! assert_eq!(matching.pairs(), vec![(0, 1), (2, 3), (4, 5)]);
//! ```

use std::collections::BTreeMap;

pub mod algorithm;
pub mod data_structures;
pub mod pairing;

pub use crate::algorithm::{
    augment_matching, find_augmenting_path, Algorithm, AlgorithmError, AlgorithmId,
    EdmondsMatching, ExplorationOrder, MatchingConfig, MatchingStatistics, NodeId, Result,
    VerificationLevel,
};
pub use crate::data_structures::{AdjacencyCell, AlternatingForest, Graph, Matching};

/// Maximum matching of `graph` with the default configuration
pub fn maximum_matching(graph: &Graph) -> Result<Matching> {
    EdmondsMatching::new().find_maximum_matching(graph)
}

/// Maximum matching of the graph given by a square 0/1 adjacency matrix
///
/// The result maps every matched vertex to its partner, in both directions.
/// Exposed vertices are absent. Malformed matrices are rejected with
/// [`AlgorithmError::InvalidInput`] before any search runs.
pub fn maximum_matching_from_matrix<R, T>(rows: &[R]) -> Result<BTreeMap<NodeId, NodeId>>
where
    R: AsRef<[T]>,
    T: AdjacencyCell,
{
    let graph = Graph::from_matrix(rows)?;
    Ok(maximum_matching(&graph)?.to_map())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_from_matrix() {
        let map = maximum_matching_from_matrix(&[
            [0, 1, 0, 0],
            [1, 0, 1, 0],
            [0, 1, 0, 1],
            [0, 0, 1, 0],
        ])
        .unwrap();

        assert_eq!(map, BTreeMap::from([(0, 1), (1, 0), (2, 3), (3, 2)]));
    }

    #[test]
    fn test_matrix_without_edges() {
        let map = maximum_matching_from_matrix(&[[false; 3]; 3]).unwrap();
        assert!(map.is_empty());

        let rows: Vec<Vec<u8>> = Vec::new();
        assert!(maximum_matching_from_matrix(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_matrix_is_rejected() {
        let err = maximum_matching_from_matrix(&[[0, 1], [0, 0]]).unwrap_err();
        assert!(matches!(err, AlgorithmError::InvalidInput(_)));
    }

    #[test]
    fn test_odd_cycle_leaves_one_vertex_exposed() {
        let pentagon = Graph::from_edges(5, (0..5).map(|v| (v, (v + 1) % 5))).unwrap();
        let matching = maximum_matching(&pentagon).unwrap();

        assert_eq!(matching.size(), 2);
        assert_eq!(matching.exposed_vertices().count(), 1);
    }
}
