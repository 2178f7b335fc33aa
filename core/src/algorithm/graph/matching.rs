//! Maximum-Cardinality Matching in General Graphs
//!
//! Edmonds' blossom algorithm: starting from an initial matching (empty by
//! default), repeatedly search for an augmenting path and flip the matching
//! along it. When the search comes back empty the matching is maximum.
//!
//! # Theoretical Foundation
//! Berge's theorem: a matching `M` is maximum iff the graph contains no
//! `M`-augmenting path. Edmonds' contribution is the search: odd cycles
//! (blossoms) closed by two outer vertices of the same alternating tree are
//! shrunk to a single vertex, and an augmenting path exists in the contracted
//! graph iff one exists in the original.
//!
//! # Complexity
//! - At most `n/2` augmentations
//! - Each search contracts at most `n/2` blossoms, each contraction costs
//!   `O(n²)` on the dense representation
//! - Overall `O(n⁴)` time, `O(n²)` space per recursion level
//!
//! # Invariants
//! - Every intermediate matching is valid for the input graph
//! - Each augmentation grows the matching by exactly one pair

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::augmenting::{find_augmenting_path_traced, SearchTrace};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmId, AlgorithmParameter, NodeId,
    Result,
};
use crate::data_structures::graph::Graph;
use crate::data_structures::matching::Matching;

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════

/// Order in which the search visits candidate vertices and their neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationOrder {
    #[default]
    Ascending,
    Descending,
}

impl ExplorationOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The vertices `0..n` in this order
    pub fn sequence(self, n: usize) -> Vec<NodeId> {
        match self {
            Self::Ascending => (0..n).collect(),
            Self::Descending => (0..n).rev().collect(),
        }
    }
}

impl FromStr for ExplorationOrder {
    type Err = AlgorithmError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "ascending" => Ok(Self::Ascending),
            "descending" => Ok(Self::Descending),
            _ => Err(AlgorithmError::invalid_parameter(
                "exploration_order",
                format!("{}. Valid options: ascending, descending", value),
            )),
        }
    }
}

impl fmt::Display for ExplorationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks applied to the final matching before it is returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLevel {
    None,
    /// Matching validity against the input graph
    #[default]
    Basic,
    /// Validity plus one more search proving no augmenting path remains
    Full,
}

impl VerificationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Full => "full",
        }
    }
}

impl FromStr for VerificationLevel {
    type Err = AlgorithmError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(Self::None),
            "basic" => Ok(Self::Basic),
            "full" => Ok(Self::Full),
            _ => Err(AlgorithmError::invalid_parameter(
                "verification",
                format!("{}. Valid options: none, basic, full", value),
            )),
        }
    }
}

impl fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub exploration_order: ExplorationOrder,
    pub verification: VerificationLevel,
}

/// Counters collected over one solver run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingStatistics {
    /// Augmenting-path searches started, including the final empty one
    pub searches: usize,
    pub augmentations: usize,
    pub blossoms_contracted: usize,
    /// Deepest nesting of contracted instances seen by any search
    pub deepest_recursion: usize,
    pub matching_size: usize,
    pub elapsed_ms: u128,
}

// ═══════════════════════════════════════════════════════════════════════════
// AUGMENTATION
// ═══════════════════════════════════════════════════════════════════════════

/// Flips `matching` along the augmenting path `path`
///
/// Every vertex of the path is unmatched (together with its old partner),
/// then the pairs `(path[i - 1], path[i])` for odd `i` are matched. The
/// result is one pair larger. An empty path returns an unchanged copy.
///
/// The path is checked against `graph` before anything is flipped: an odd
/// vertex count, a repeated vertex, a step that is not an edge or an
/// unmatched odd step is an [`AlgorithmError::InvariantViolation`].
///
/// ```
/// use blossom_core::{augment_matching, Graph, Matching};
///
/// let graph = Graph::from_edges(6, (1..6).map(|v| (v - 1, v))).unwrap();
/// let matching = Matching::from_pairs(&graph, [(1, 2), (3, 4)]).unwrap();
///
/// let augmented = augment_matching(&graph, &matching, &[0, 1, 2, 3, 4, 5]).unwrap();
/// assert_eq!(augmented.pairs(), vec![(0, 1), (2, 3), (4, 5)]);
/// ```
pub fn augment_matching(
    graph: &Graph,
    matching: &Matching,
    path: &[NodeId],
) -> Result<Matching> {
    if path.is_empty() {
        return Ok(matching.clone());
    }

    check_augmenting_path(graph, matching, path)?;

    let mut augmented = matching.clone();
    for &v in path {
        augmented.unmatch(v);
    }
    for pair in path.chunks_exact(2) {
        augmented.set_pair(pair[0], pair[1]);
    }
    Ok(augmented)
}

fn check_augmenting_path(
    graph: &Graph,
    matching: &Matching,
    path: &[NodeId],
) -> Result<()> {
    if path.len() % 2 != 0 {
        return Err(AlgorithmError::invariant(format!(
            "augmenting path {:?} has an odd number of vertices",
            path
        )));
    }

    let mut seen = vec![false; matching.vertex_count()];
    for &v in path {
        if v >= seen.len() {
            return Err(AlgorithmError::invariant(format!(
                "path vertex {} is outside the matching's vertex set",
                v
            )));
        }
        if std::mem::replace(&mut seen[v], true) {
            return Err(AlgorithmError::invariant(format!(
                "vertex {} appears twice in augmenting path {:?}",
                v, path
            )));
        }
    }

    let first = path[0];
    let last = path[path.len() - 1];
    if !matching.is_exposed(first) || !matching.is_exposed(last) {
        return Err(AlgorithmError::invariant(format!(
            "augmenting path {:?} does not connect two exposed vertices",
            path
        )));
    }

    for pair in path.windows(2) {
        if !graph.adjacent(pair[0], pair[1]) {
            return Err(AlgorithmError::invariant(format!(
                "({}, {}) of augmenting path {:?} is not an edge of the graph",
                pair[0], pair[1], path
            )));
        }
    }

    for j in (1..path.len() - 1).step_by(2) {
        if !matching.contains_pair(path[j], path[j + 1]) {
            return Err(AlgorithmError::invariant(format!(
                "edge ({}, {}) of augmenting path {:?} should be matched",
                path[j],
                path[j + 1],
                path
            )));
        }
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// SOLVER
// ═══════════════════════════════════════════════════════════════════════════

/// Edmonds' blossom algorithm for maximum-cardinality matching
#[derive(Debug, Clone, Default)]
pub struct EdmondsMatching {
    config: MatchingConfig,
    statistics: MatchingStatistics,
}

impl EdmondsMatching {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchingConfig) -> Self {
        Self {
            config,
            statistics: MatchingStatistics::default(),
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Statistics of the most recent run
    pub fn statistics(&self) -> &MatchingStatistics {
        &self.statistics
    }

    /// Computes a maximum matching of `graph` starting from the empty matching
    pub fn find_maximum_matching(&mut self, graph: &Graph) -> Result<Matching> {
        self.find_maximum_matching_from(graph, Matching::empty(graph.vertex_count()))
    }

    /// Computes a maximum matching of `graph` that starts from `initial`
    ///
    /// `initial` must be a valid matching of `graph`; it is only ever grown,
    /// so every vertex it covers stays covered.
    pub fn find_maximum_matching_from(
        &mut self,
        graph: &Graph,
        initial: Matching,
    ) -> Result<Matching> {
        initial.validate(graph)?;

        let start = Instant::now();
        let mut statistics = MatchingStatistics::default();
        let mut trace = SearchTrace::default();
        let mut matching = initial;

        loop {
            statistics.searches += 1;
            let path = find_augmenting_path_traced(graph, &matching, &self.config, &mut trace)?;
            if path.is_empty() {
                break;
            }

            let augmented = augment_matching(graph, &matching, &path)?;
            if augmented.size() != matching.size() + 1 {
                return Err(AlgorithmError::invariant(format!(
                    "augmenting along {:?} changed the matching size from {} to {}",
                    path,
                    matching.size(),
                    augmented.size()
                )));
            }

            statistics.augmentations += 1;
            debug!(
                "augmentation {}: path {:?}, matching size {}",
                statistics.augmentations,
                path,
                augmented.size()
            );
            matching = augmented;
        }

        self.verify(graph, &matching)?;

        statistics.blossoms_contracted = trace.blossoms_contracted;
        statistics.deepest_recursion = trace.deepest_recursion;
        statistics.matching_size = matching.size();
        statistics.elapsed_ms = start.elapsed().as_millis();

        info!(
            "maximum matching of size {} on {} vertices: {} augmentations, {} blossoms, depth {}",
            statistics.matching_size,
            graph.vertex_count(),
            statistics.augmentations,
            statistics.blossoms_contracted,
            statistics.deepest_recursion
        );

        self.statistics = statistics;
        Ok(matching)
    }

    fn verify(&self, graph: &Graph, matching: &Matching) -> Result<()> {
        if self.config.verification == VerificationLevel::None {
            return Ok(());
        }

        matching.validate(graph).map_err(|err| {
            AlgorithmError::invariant(format!("solver produced an invalid matching: {}", err))
        })?;

        if self.config.verification == VerificationLevel::Full {
            let mut trace = SearchTrace::default();
            let path = find_augmenting_path_traced(graph, matching, &self.config, &mut trace)?;
            if !path.is_empty() {
                return Err(AlgorithmError::invariant(format!(
                    "final matching still has augmenting path {:?}",
                    path
                )));
            }
        }

        Ok(())
    }
}

impl Algorithm for EdmondsMatching {
    type Output = Matching;

    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("edmonds_blossom")
    }

    fn name(&self) -> &'static str {
        "Edmonds' Blossom Algorithm"
    }

    fn category(&self) -> &'static str {
        "graph_matching"
    }

    fn description(&self) -> String {
        "Maximum-cardinality matching in general graphs. Grows alternating \
         trees from exposed vertices, contracts odd cycles into supervertices \
         and lifts the augmenting paths found in the contracted graph."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V⁴)".to_string(),
            space_complexity: "O(V³)".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter::new(
                "exploration_order",
                self.config.exploration_order.as_str(),
                &["ascending", "descending"],
            ),
            AlgorithmParameter::new(
                "verification",
                self.config.verification.as_str(),
                &["none", "basic", "full"],
            ),
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "exploration_order" => {
                self.config.exploration_order = value.parse()?;
                Ok(())
            }
            "verification" => {
                self.config.verification = value.parse()?;
                Ok(())
            }
            _ => Err(AlgorithmError::invalid_parameter(
                name,
                "Unknown parameter. Valid parameters: exploration_order, verification",
            )),
        }
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "exploration_order" => Some(self.config.exploration_order.to_string()),
            "verification" => Some(self.config.verification.to_string()),
            _ => None,
        }
    }

    fn is_compatible_with(&self, _graph: &Graph) -> Result<()> {
        // any simple undirected graph, including the empty one
        Ok(())
    }

    fn execute(&mut self, graph: &Graph) -> Result<Matching> {
        self.find_maximum_matching(graph)
    }
}
