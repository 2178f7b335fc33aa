//! Blossom contraction and augmenting-path lifting
//!
//! A blossom is an odd cycle closed by an edge between two outer vertices of
//! the same alternating tree. Contraction collapses the cycle into its base,
//! producing a smaller instance in which the search can continue; lifting maps
//! a path found in that instance back onto the original vertices.
//!
//! # Correctness
//! Every cycle vertex except the base is matched inside the cycle, so the base
//! is the only member whose matched edge (if any) leaves the blossom. Going
//! round an odd cycle from the base, exactly one direction reaches any other
//! member over an even number of edges, and that direction starts and ends on
//! unmatched edges. Splicing that sub-path in place of the supervertex keeps
//! the lifted path alternating.

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, NodeId, Result};
use crate::data_structures::forest::AlternatingForest;
use crate::data_structures::graph::Graph;
use crate::data_structures::matching::Matching;

/// Odd cycle stored base-first in cycle order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blossom {
    vertices: Vec<NodeId>,
}

impl Blossom {
    /// Wraps a cycle given base-first; it must have odd length ≥ 3 and no
    /// repeated vertex
    pub fn new(vertices: Vec<NodeId>) -> Result<Self> {
        if vertices.len() < 3 || vertices.len() % 2 == 0 {
            return Err(AlgorithmError::invariant(format!(
                "blossom {:?} is not an odd cycle",
                vertices
            )));
        }

        let mut seen = vertices.clone();
        seen.sort_unstable();
        if seen.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(AlgorithmError::invariant(format!(
                "blossom {:?} repeats a vertex",
                vertices
            )));
        }

        Ok(Self { vertices })
    }

    /// The cycle closed by edge `{v, w}` between two outer vertices of one tree
    ///
    /// The tree path `v → … → w` is rotated so that it starts at the lowest
    /// common ancestor, the vertex of the cycle closest to the root.
    pub fn from_forest(forest: &AlternatingForest, v: NodeId, w: NodeId) -> Result<Self> {
        let base = forest.lowest_common_ancestor(v, w)?;
        let mut cycle = forest.path(v, w)?;

        let offset = cycle
            .iter()
            .position(|&vertex| vertex == base)
            .ok_or_else(|| {
                AlgorithmError::invariant(format!(
                    "base {} missing from tree path {:?}",
                    base, cycle
                ))
            })?;
        cycle.rotate_left(offset);

        Self::new(cycle)
    }

    #[inline]
    pub fn base(&self) -> NodeId {
        self.vertices[0]
    }

    pub fn vertices(&self) -> &[NodeId] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn position(&self, vertex: NodeId) -> Option<usize> {
        self.vertices.iter().position(|&member| member == vertex)
    }

    pub fn contains(&self, vertex: NodeId) -> bool {
        self.position(vertex).is_some()
    }
}

/// Collapses `blossom` into its base
///
/// Returns a new graph in which the base inherits every external edge of the
/// cycle and the other members are isolated, together with a new matching
/// that drops every pair touching a non-base member. The inputs are left
/// untouched.
pub fn contract_blossom(
    blossom: &Blossom,
    graph: &Graph,
    matching: &Matching,
) -> Result<(Graph, Matching)> {
    let n = graph.vertex_count();
    if let Some(&outside) = blossom.vertices().iter().find(|&&v| v >= n) {
        return Err(AlgorithmError::invariant(format!(
            "blossom member {} is outside the graph's {} vertices",
            outside, n
        )));
    }

    let supervertex = blossom.base();
    let absorbed = &blossom.vertices()[1..];
    let mut contracted = graph.clone();

    for &member in absorbed {
        for neighbor in graph.neighbors(member) {
            if neighbor != supervertex && !blossom.contains(neighbor) {
                contracted.set_edge(supervertex, neighbor, true);
            }
        }
    }

    for &member in absorbed {
        for neighbor in graph.neighbors(member) {
            contracted.set_edge(member, neighbor, false);
        }
    }

    let contracted_matching =
        matching.retain_pairs(|u, v| !absorbed.contains(&u) && !absorbed.contains(&v));

    Ok((contracted, contracted_matching))
}

/// Maps an augmenting path of the contracted graph back onto `graph`
///
/// A path that avoids the blossom is returned unchanged. Otherwise the path is
/// oriented so that the supervertex is entered along the base's matched edge
/// (or is the first vertex); edge `(P[j], P[j+1])` of an augmenting path is
/// matched exactly when `j` is odd, so a supervertex at an odd position is
/// lifted on the reversed path.
pub fn lift_augmenting_path(
    path: &[NodeId],
    blossom: &Blossom,
    graph: &Graph,
) -> Result<Vec<NodeId>> {
    let Some(index) = path.iter().position(|&v| blossom.contains(v)) else {
        return Ok(path.to_vec());
    };

    if index % 2 == 1 {
        let reversed: Vec<NodeId> = path.iter().rev().copied().collect();
        let mut lifted = lift_oriented(&reversed, path.len() - 1 - index, blossom, graph)?;
        lifted.reverse();
        return Ok(lifted);
    }

    lift_oriented(path, index, blossom, graph)
}

fn lift_oriented(
    path: &[NodeId],
    index: usize,
    blossom: &Blossom,
    graph: &Graph,
) -> Result<Vec<NodeId>> {
    let cycle = blossom.vertices();
    let len = cycle.len();

    let entry = blossom.position(path[index]).ok_or_else(|| {
        AlgorithmError::invariant(format!(
            "path vertex {} is not in blossom {:?}",
            path[index], cycle
        ))
    })?;

    let exit = match path.get(index + 1) {
        None => len - 1,
        Some(&next) => cycle
            .iter()
            .position(|&member| graph.adjacent(member, next))
            .ok_or_else(|| {
                AlgorithmError::invariant(format!(
                    "no vertex of blossom {:?} is adjacent to {}",
                    cycle, next
                ))
            })?,
    };

    let forward = (exit + len - entry) % len;
    let through: Vec<NodeId> = if forward % 2 == 0 {
        (0..=forward).map(|k| cycle[(entry + k) % len]).collect()
    } else {
        // the other way round is len - forward edges, which is even
        (0..=len - forward)
            .map(|k| cycle[(entry + len - k) % len])
            .collect()
    };

    let mut lifted = Vec::with_capacity(path.len() + through.len() - 1);
    lifted.extend_from_slice(&path[..index]);
    lifted.extend(through);
    lifted.extend_from_slice(&path[index + 1..]);
    Ok(lifted)
}
