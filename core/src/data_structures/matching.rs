//! Matching representation with validity checks
//!
//! A matching is a partial, symmetric, injective `mate` relation: whenever
//! `mate(v) = w` then `mate(w) = v`, and `{v, w}` is an edge of the graph the
//! matching belongs to. Unmatched vertices are *exposed*.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, NodeId, Result};
use crate::data_structures::graph::Graph;

/// Set of vertex-disjoint edges, stored as a mate table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Matching {
    mate: Vec<Option<NodeId>>,
}

impl Matching {
    /// The empty matching over `n` vertices
    pub fn empty(n: usize) -> Self {
        Self {
            mate: vec![None; n],
        }
    }

    /// Builds a matching from explicit pairs, validated against `graph`
    pub fn from_pairs<I>(graph: &Graph, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut matching = Self::empty(graph.vertex_count());

        for (u, v) in pairs {
            if !graph.adjacent(u, v) {
                return Err(AlgorithmError::invalid_input(format!(
                    "pair ({}, {}) is not an edge of the graph",
                    u, v
                )));
            }
            if let Some(w) = matching.mate_of(u).or(matching.mate_of(v)) {
                return Err(AlgorithmError::invalid_input(format!(
                    "pair ({}, {}) reuses a vertex already matched to {}",
                    u, v, w
                )));
            }
            matching.set_pair(u, v);
        }

        Ok(matching)
    }

    /// Number of vertices the matching is defined over
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.mate.len()
    }

    #[inline]
    pub fn mate_of(&self, v: NodeId) -> Option<NodeId> {
        self.mate.get(v).copied().flatten()
    }

    #[inline]
    pub fn is_exposed(&self, v: NodeId) -> bool {
        self.mate_of(v).is_none()
    }

    /// Unmatched vertices in ascending order
    pub fn exposed_vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.mate
            .iter()
            .enumerate()
            .filter_map(|(v, mate)| mate.is_none().then_some(v))
    }

    /// Number of matched pairs
    pub fn size(&self) -> usize {
        self.mate.iter().flatten().count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.mate.iter().all(Option::is_none)
    }

    pub fn contains_pair(&self, u: NodeId, v: NodeId) -> bool {
        self.mate_of(u) == Some(v)
    }

    /// Matched pairs as `(u, v)` with `u < v`, in ascending order
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.mate
            .iter()
            .enumerate()
            .filter_map(|(u, mate)| mate.filter(|&v| u < v).map(|v| (u, v)))
            .collect()
    }

    /// The mate relation as a map holding both directions of every pair
    pub fn to_map(&self) -> BTreeMap<NodeId, NodeId> {
        self.mate
            .iter()
            .enumerate()
            .filter_map(|(u, mate)| mate.map(|v| (u, v)))
            .collect()
    }

    /// Checks symmetry, injectivity and that every pair is an edge of `graph`
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        if self.vertex_count() != graph.vertex_count() {
            return Err(AlgorithmError::invalid_input(format!(
                "matching covers {} vertices but the graph has {}",
                self.vertex_count(),
                graph.vertex_count()
            )));
        }

        for (u, mate) in self.mate.iter().enumerate() {
            let Some(v) = *mate else { continue };

            if v == u || self.mate_of(v) != Some(u) {
                return Err(AlgorithmError::invalid_input(format!(
                    "mate relation is not symmetric at vertex {}",
                    u
                )));
            }
            if !graph.adjacent(u, v) {
                return Err(AlgorithmError::invalid_input(format!(
                    "matched pair ({}, {}) is not an edge of the graph",
                    u, v
                )));
            }
        }

        Ok(())
    }

    /// Matches `u` with `v`, overwriting both entries
    pub(crate) fn set_pair(&mut self, u: NodeId, v: NodeId) {
        self.mate[u] = Some(v);
        self.mate[v] = Some(u);
    }

    /// Unmatches `v` together with its partner
    pub(crate) fn unmatch(&mut self, v: NodeId) {
        if let Some(w) = self.mate[v].take() {
            self.mate[w] = None;
        }
    }

    /// A copy keeping only the pairs accepted by `keep`
    pub(crate) fn retain_pairs<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(NodeId, NodeId) -> bool,
    {
        let mut retained = Self::empty(self.vertex_count());
        for (u, v) in self.pairs() {
            if keep(u, v) {
                retained.set_pair(u, v);
            }
        }
        retained
    }
}
