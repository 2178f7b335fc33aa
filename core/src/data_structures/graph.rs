//! Dense undirected graph over a fixed vertex set
//!
//! This module implements the simple undirected graph consumed by the
//! matching solvers. Adjacency is a row-major `n × n` boolean matrix, which
//! gives O(1) adjacency tests and cheap whole-graph copies for blossom
//! contraction.
//!
//! # Invariants
//! - The matrix is symmetric: `adjacent(u, v) == adjacent(v, u)`
//! - The diagonal is empty: `adjacent(v, v) == false`
//! - `edge_count` always equals the number of unordered adjacent pairs
//!
//! A graph is immutable once built; contraction derives a new instance.

use std::fmt::Debug;

use rayon::prelude::*;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, NodeId, Result};

/// A cell of an adjacency matrix
///
/// Numeric cells must be exactly `0` or `1`; anything else is rejected as
/// invalid input instead of being coerced.
pub trait AdjacencyCell: Copy + Debug {
    /// `Some(linked)` for a well-formed cell, `None` otherwise
    fn as_link(self) -> Option<bool>;
}

impl AdjacencyCell for bool {
    #[inline]
    fn as_link(self) -> Option<bool> {
        Some(self)
    }
}

macro_rules! impl_numeric_cell {
    ($($ty:ty),*) => {
        $(
            impl AdjacencyCell for $ty {
                #[inline]
                fn as_link(self) -> Option<bool> {
                    match self {
                        0 => Some(false),
                        1 => Some(true),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_numeric_cell!(u8, i32, u32, i64, u64, usize);

/// Simple undirected graph with a dense adjacency matrix
///
/// Deserialization goes through the same checks as [`Graph::from_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    /// Number of vertices
    order: usize,

    /// Row-major `order × order` adjacency matrix
    adjacency: Vec<bool>,

    /// Number of unordered edges
    edge_count: usize,
}

impl Graph {
    /// Creates a graph with `n` vertices and no edges
    pub fn empty(n: usize) -> Self {
        Self {
            order: n,
            adjacency: vec![false; n * n],
            edge_count: 0,
        }
    }

    /// Builds a graph from a square 0/1 (or boolean) adjacency matrix
    ///
    /// Fails with [`AlgorithmError::InvalidInput`] when the matrix is not
    /// square, contains a cell other than 0/1, has a self-loop, or is not
    /// symmetric.
    pub fn from_matrix<R, T>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[T]>,
        T: AdjacencyCell,
    {
        let n = rows.len();
        let mut adjacency = Vec::with_capacity(n * n);

        for (u, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(AlgorithmError::invalid_input(format!(
                    "matrix is not square: row {} has {} entries, expected {}",
                    u,
                    row.len(),
                    n
                )));
            }

            for (v, &cell) in row.iter().enumerate() {
                let linked = cell.as_link().ok_or_else(|| {
                    AlgorithmError::invalid_input(format!(
                        "entry ({}, {}) is {:?}, expected 0 or 1",
                        u, v, cell
                    ))
                })?;

                if linked && u == v {
                    return Err(AlgorithmError::invalid_input(format!(
                        "self-loop at vertex {}",
                        u
                    )));
                }

                adjacency.push(linked);
            }
        }

        check_symmetric(n, &adjacency)?;
        Ok(Self::from_adjacency(n, adjacency))
    }

    /// Builds a graph on `n` vertices from an edge list
    ///
    /// Duplicate edges are idempotent. Self-loops and endpoints outside
    /// `0..n` are rejected.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut graph = Self::empty(n);

        for (u, v) in edges {
            if u >= n || v >= n {
                return Err(AlgorithmError::invalid_input(format!(
                    "edge ({}, {}) has an endpoint outside 0..{}",
                    u, v, n
                )));
            }
            if u == v {
                return Err(AlgorithmError::invalid_input(format!(
                    "self-loop at vertex {}",
                    u
                )));
            }
            graph.set_edge(u, v, true);
        }

        Ok(graph)
    }

    /// Builds a graph by evaluating a linkage predicate on every vertex pair
    ///
    /// The predicate is only ever called with `u < v`, so the result is
    /// symmetric even for predicates that are not. Rows are evaluated in
    /// parallel.
    pub fn from_predicate<F>(n: usize, linked: F) -> Self
    where
        F: Fn(NodeId, NodeId) -> bool + Sync,
    {
        let rows: Vec<Vec<bool>> = (0..n)
            .into_par_iter()
            .map(|u| {
                (0..n)
                    .map(|v| match u.cmp(&v) {
                        std::cmp::Ordering::Less => linked(u, v),
                        std::cmp::Ordering::Greater => linked(v, u),
                        std::cmp::Ordering::Equal => false,
                    })
                    .collect()
            })
            .collect();

        Self::from_adjacency(n, rows.concat())
    }

    fn from_adjacency(order: usize, adjacency: Vec<bool>) -> Self {
        let edge_count = adjacency.iter().filter(|&&linked| linked).count() / 2;
        Self {
            order,
            adjacency,
            edge_count,
        }
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.order
    }

    /// Number of undirected edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// O(1) adjacency test; vertices outside the graph are never adjacent
    #[inline]
    pub fn adjacent(&self, u: NodeId, v: NodeId) -> bool {
        u < self.order && v < self.order && self.adjacency[u * self.order + v]
    }

    fn row(&self, v: NodeId) -> &[bool] {
        if v < self.order {
            &self.adjacency[v * self.order..(v + 1) * self.order]
        } else {
            &[]
        }
    }

    /// Neighbors of `v` in ascending order
    pub fn neighbors(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.row(v)
            .iter()
            .enumerate()
            .filter_map(|(w, &linked)| linked.then_some(w))
    }

    pub fn degree(&self, v: NodeId) -> usize {
        self.row(v).iter().filter(|&&linked| linked).count()
    }

    /// All edges as `(u, v)` with `u < v`, in ascending order
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        (0..self.order).flat_map(move |u| {
            self.neighbors(u)
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    pub fn is_isolated(&self, v: NodeId) -> bool {
        !self.row(v).iter().any(|&linked| linked)
    }

    /// Number of vertices with at least one incident edge
    ///
    /// Strictly decreases with every blossom contraction, which bounds the
    /// recursion depth of the augmenting-path search.
    pub fn live_vertex_count(&self) -> usize {
        (0..self.order).filter(|&v| !self.is_isolated(v)).count()
    }

    /// Adds or removes the undirected edge `{u, v}`
    ///
    /// Only used on freshly cloned graphs while deriving a contraction.
    pub(crate) fn set_edge(&mut self, u: NodeId, v: NodeId, present: bool) {
        debug_assert!(u < self.order && v < self.order && u != v);

        let index = u * self.order + v;
        if self.adjacency[index] == present {
            return;
        }

        self.adjacency[index] = present;
        self.adjacency[v * self.order + u] = present;
        if present {
            self.edge_count += 1;
        } else {
            self.edge_count -= 1;
        }
    }
}

/// Wire form of [`Graph`], validated before it becomes one
#[derive(Deserialize)]
struct GraphRepr {
    order: usize,
    adjacency: Vec<bool>,
    #[serde(default)]
    edge_count: Option<usize>,
}

impl<'de> Deserialize<'de> for Graph {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = GraphRepr::deserialize(deserializer)?;
        Graph::from_repr(repr).map_err(de::Error::custom)
    }
}

impl Graph {
    fn from_repr(repr: GraphRepr) -> Result<Self> {
        let n = repr.order;
        if n.checked_mul(n) != Some(repr.adjacency.len()) {
            return Err(AlgorithmError::invalid_input(format!(
                "adjacency has {} entries, expected {} × {}",
                repr.adjacency.len(),
                n,
                n
            )));
        }
        if let Some(v) = (0..n).find(|&v| repr.adjacency[v * n + v]) {
            return Err(AlgorithmError::invalid_input(format!(
                "self-loop at vertex {}",
                v
            )));
        }
        check_symmetric(n, &repr.adjacency)?;

        let graph = Self::from_adjacency(n, repr.adjacency);
        match repr.edge_count {
            Some(count) if count != graph.edge_count => Err(AlgorithmError::invalid_input(
                format!(
                    "edge_count is {} but the matrix holds {} edges",
                    count, graph.edge_count
                ),
            )),
            _ => Ok(graph),
        }
    }
}

fn check_symmetric(n: usize, adjacency: &[bool]) -> Result<()> {
    for u in 0..n {
        for v in (u + 1)..n {
            if adjacency[u * n + v] != adjacency[v * n + u] {
                return Err(AlgorithmError::invalid_input(format!(
                    "matrix is not symmetric at ({}, {})",
                    u, v
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_from_matrix() {
        let graph = Graph::from_matrix(&[
            [0, 1, 1],
            [1, 0, 0],
            [1, 0, 0],
        ])
        .unwrap();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.adjacent(0, 1));
        assert!(graph.adjacent(2, 0));
        assert!(!graph.adjacent(1, 2));
        assert!(!graph.adjacent(0, 7));
        assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(graph.degree(1), 1);
    }

    #[test]
    fn test_boolean_matrix() {
        let rows = vec![vec![false, true], vec![true, false]];
        let graph = Graph::from_matrix(&rows).unwrap();

        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn test_invalid_matrices_are_rejected() {
        let not_square = Graph::from_matrix(&[vec![0, 1], vec![1]]);
        assert!(matches!(not_square, Err(AlgorithmError::InvalidInput(_))));

        let asymmetric = Graph::from_matrix(&[[0, 1], [0, 0]]);
        assert!(matches!(asymmetric, Err(AlgorithmError::InvalidInput(_))));

        let self_loop = Graph::from_matrix(&[[1, 0], [0, 0]]);
        assert!(matches!(self_loop, Err(AlgorithmError::InvalidInput(_))));

        let not_binary = Graph::from_matrix(&[[0, 2], [2, 0]]);
        assert!(matches!(not_binary, Err(AlgorithmError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_matrix() {
        let rows: Vec<Vec<u8>> = Vec::new();
        let graph = Graph::from_matrix(&rows).unwrap();

        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.live_vertex_count(), 0);
    }

    #[test]
    fn test_from_edges() {
        let graph = Graph::from_edges(4, [(0, 1), (1, 0), (2, 3)]).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert!(graph.adjacent(3, 2));
        assert_eq!(graph.live_vertex_count(), 4);

        assert!(Graph::from_edges(3, [(0, 3)]).is_err());
        assert!(Graph::from_edges(3, [(1, 1)]).is_err());
    }

    #[test]
    fn test_from_predicate_matches_sequential_build() {
        let linked = |u: NodeId, v: NodeId| (u + v) % 3 == 0;
        let graph = Graph::from_predicate(9, linked);

        let expected: Vec<(NodeId, NodeId)> = (0..9)
            .flat_map(|u| ((u + 1)..9).map(move |v| (u, v)))
            .filter(|&(u, v)| linked(u, v))
            .collect();

        assert_eq!(graph.edges().collect::<Vec<_>>(), expected);
        assert_eq!(graph, Graph::from_edges(9, expected).unwrap());
    }

    #[test]
    fn test_set_edge_and_isolation() {
        let mut graph = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        assert_eq!(graph.live_vertex_count(), 3);

        graph.set_edge(1, 2, false);
        graph.set_edge(1, 2, false);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.is_isolated(2));
        assert_eq!(graph.live_vertex_count(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let graph = Graph::from_edges(3, [(0, 2)]).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        let restored: Graph = serde_json::from_str(&json).unwrap();

        assert_eq!(graph, restored);
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let short: serde_json::Result<Graph> =
            serde_json::from_str(r#"{"order":3,"adjacency":[],"edge_count":0}"#);
        let err = short.unwrap_err().to_string();
        assert!(err.starts_with("Invalid input"), "{}", err);

        for document in [
            r#"{"order":2,"adjacency":[false,true,false,false]}"#,
            r#"{"order":2,"adjacency":[true,false,false,false],"edge_count":0}"#,
            r#"{"order":2,"adjacency":[false,true,true,false],"edge_count":5}"#,
        ] {
            assert!(serde_json::from_str::<Graph>(document).is_err(), "{}", document);
        }

        let restored: Graph =
            serde_json::from_str(r#"{"order":2,"adjacency":[false,true,true,false]}"#).unwrap();
        assert_eq!(restored.edge_count(), 1);
    }

    #[test]
    fn test_wire_form_reports_invalid_input() {
        let asymmetric = GraphRepr {
            order: 2,
            adjacency: vec![false, true, false, false],
            edge_count: None,
        };
        assert!(matches!(
            Graph::from_repr(asymmetric),
            Err(AlgorithmError::InvalidInput(_))
        ));

        let short = GraphRepr {
            order: 3,
            adjacency: Vec::new(),
            edge_count: Some(0),
        };
        assert!(matches!(
            Graph::from_repr(short),
            Err(AlgorithmError::InvalidInput(_))
        ));
    }
}
