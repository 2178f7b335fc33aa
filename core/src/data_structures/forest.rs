//! Alternating forest for augmenting-path search
//!
//! A set of disjoint rooted trees over a subset of the vertices. Roots are
//! exposed vertices; every other member entered the forest either as the
//! unmatched neighbor of an outer vertex or as the matched partner of that
//! neighbor.
//!
//! A member's role is never stored: it is *outer* when its distance to the
//! root is even and *inner* when it is odd, computed from the parent relation
//! at query time.

use crate::algorithm::traits::{AlgorithmError, NodeId, Result};

/// Rooted forest with parent and child links
#[derive(Debug, Clone)]
pub struct AlternatingForest {
    /// Parent of each member; `None` for roots and non-members
    parent: Vec<Option<NodeId>>,

    /// Membership flags
    members: Vec<bool>,

    /// Children of each member in insertion order
    children: Vec<Vec<NodeId>>,

    /// Number of members
    len: usize,
}

impl AlternatingForest {
    /// Creates an empty forest over the vertex set `0..n`
    pub fn new(n: usize) -> Self {
        Self {
            parent: vec![None; n],
            members: vec![false; n],
            children: vec![Vec::new(); n],
            len: 0,
        }
    }

    /// Inserts `vertex` as a new root (`parent = None`) or as a child of an
    /// existing member
    pub fn add(&mut self, vertex: NodeId, parent: Option<NodeId>) -> Result<()> {
        if vertex >= self.members.len() {
            return Err(AlgorithmError::invariant(format!(
                "vertex {} is outside the forest's vertex set",
                vertex
            )));
        }
        if self.members[vertex] {
            return Err(AlgorithmError::invariant(format!(
                "vertex {} is already in the forest",
                vertex
            )));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(AlgorithmError::invariant(format!(
                    "cannot attach {} under {}: parent is not in the forest",
                    vertex, p
                )));
            }
            self.children[p].push(vertex);
        }

        self.members[vertex] = true;
        self.parent[vertex] = parent;
        self.len += 1;
        Ok(())
    }

    #[inline]
    pub fn contains(&self, vertex: NodeId) -> bool {
        self.members.get(vertex).copied().unwrap_or(false)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in ascending order
    pub fn members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(v, &member)| member.then_some(v))
    }

    fn ensure_member(&self, vertex: NodeId) -> Result<()> {
        if self.contains(vertex) {
            Ok(())
        } else {
            Err(AlgorithmError::invariant(format!(
                "vertex {} is not in the forest",
                vertex
            )))
        }
    }

    pub fn parent_of(&self, vertex: NodeId) -> Result<Option<NodeId>> {
        self.ensure_member(vertex)?;
        Ok(self.parent[vertex])
    }

    pub fn children_of(&self, vertex: NodeId) -> Result<&[NodeId]> {
        self.ensure_member(vertex)?;
        Ok(&self.children[vertex])
    }

    /// Walks up from `vertex`, stopping at `stop` or at the root
    fn walk_up(&self, vertex: NodeId, stop: Option<NodeId>) -> Result<Vec<NodeId>> {
        self.ensure_member(vertex)?;

        let mut path = vec![vertex];
        let mut current = vertex;
        while Some(current) != stop {
            match self.parent[current] {
                Some(p) => {
                    path.push(p);
                    current = p;
                }
                None => break,
            }
        }
        Ok(path)
    }

    /// `[vertex, parent, …, root]`
    pub fn path_to_root(&self, vertex: NodeId) -> Result<Vec<NodeId>> {
        self.walk_up(vertex, None)
    }

    /// `[vertex, …, ancestor]`, or the path to the root when `ancestor` is
    /// not on the way up
    pub fn path_to_ancestor(&self, vertex: NodeId, ancestor: NodeId) -> Result<Vec<NodeId>> {
        self.walk_up(vertex, Some(ancestor))
    }

    pub fn root_of(&self, vertex: NodeId) -> Result<NodeId> {
        self.ensure_member(vertex)?;

        let mut current = vertex;
        while let Some(p) = self.parent[current] {
            current = p;
        }
        Ok(current)
    }

    pub fn distance_to_root(&self, vertex: NodeId) -> Result<usize> {
        self.ensure_member(vertex)?;

        let mut distance = 0;
        let mut current = vertex;
        while let Some(p) = self.parent[current] {
            distance += 1;
            current = p;
        }
        Ok(distance)
    }

    /// Even distance from the root: the vertex may be explored
    pub fn is_outer(&self, vertex: NodeId) -> Result<bool> {
        Ok(self.distance_to_root(vertex)? % 2 == 0)
    }

    /// Odd distance from the root: reached through a matched edge
    pub fn is_inner(&self, vertex: NodeId) -> Result<bool> {
        Ok(!self.is_outer(vertex)?)
    }

    pub fn lowest_common_ancestor(&self, u: NodeId, w: NodeId) -> Result<NodeId> {
        let mut on_path_from_w = vec![false; self.members.len()];
        for ancestor in self.path_to_root(w)? {
            on_path_from_w[ancestor] = true;
        }

        self.path_to_root(u)?
            .into_iter()
            .find(|&ancestor| on_path_from_w[ancestor])
            .ok_or_else(|| {
                AlgorithmError::invariant(format!(
                    "vertices {} and {} have no common ancestor",
                    u, w
                ))
            })
    }

    /// Tree path `u → … → lca → … → w`
    pub fn path(&self, u: NodeId, w: NodeId) -> Result<Vec<NodeId>> {
        if u == w {
            self.ensure_member(u)?;
            return Ok(vec![u]);
        }

        let lca = self.lowest_common_ancestor(u, w)?;
        let mut path = self.path_to_ancestor(u, lca)?;
        path.pop();

        let mut descent = self.path_to_ancestor(w, lca)?;
        descent.reverse();
        path.extend(descent);
        Ok(path)
    }
}
