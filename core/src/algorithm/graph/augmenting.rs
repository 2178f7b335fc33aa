//! Augmenting-path search with blossom contraction
//!
//! Grows an alternating forest from every exposed vertex. An edge between
//! outer vertices of two different trees yields an augmenting path; an edge
//! between outer vertices of the same tree closes a blossom, which is
//! contracted before the search recurses into the smaller instance. The path
//! found there is lifted back through the blossom.
//!
//! All working state (forest, edge and vertex marks, contracted copies) is
//! owned by a single invocation. Recursive calls receive fresh graph and
//! matching values and never alias their caller's.

use log::{debug, trace};

use crate::algorithm::graph::blossom::{contract_blossom, lift_augmenting_path, Blossom};
use crate::algorithm::graph::matching::MatchingConfig;
use crate::algorithm::traits::{AlgorithmError, NodeId, Result};
use crate::data_structures::forest::AlternatingForest;
use crate::data_structures::graph::Graph;
use crate::data_structures::matching::Matching;

/// Counters accumulated across one search and its recursive descents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchTrace {
    pub blossoms_contracted: usize,
    pub deepest_recursion: usize,
}

/// Unmarked status of every undirected non-matching edge
struct EdgeMarks {
    order: usize,
    unmarked: Vec<bool>,
}

impl EdgeMarks {
    fn new(graph: &Graph, matching: &Matching) -> Self {
        let order = graph.vertex_count();
        let mut unmarked = vec![false; order * order];

        for (u, v) in graph.edges() {
            if !matching.contains_pair(u, v) {
                unmarked[u * order + v] = true;
                unmarked[v * order + u] = true;
            }
        }

        Self { order, unmarked }
    }

    #[inline]
    fn is_unmarked(&self, u: NodeId, v: NodeId) -> bool {
        self.unmarked[u * self.order + v]
    }

    #[inline]
    fn mark(&mut self, u: NodeId, v: NodeId) {
        self.unmarked[u * self.order + v] = false;
        self.unmarked[v * self.order + u] = false;
    }
}

/// Finds an augmenting path for `matching` in `graph`
///
/// Returns the path `[exposed, …, exposed]` with an even number of vertices,
/// or an empty vector when none exists (the matching is then maximum).
pub fn find_augmenting_path(
    graph: &Graph,
    matching: &Matching,
    config: &MatchingConfig,
) -> Result<Vec<NodeId>> {
    let mut trace = SearchTrace::default();
    find_augmenting_path_traced(graph, matching, config, &mut trace)
}

/// [`find_augmenting_path`] that also records contraction counters
pub fn find_augmenting_path_traced(
    graph: &Graph,
    matching: &Matching,
    config: &MatchingConfig,
    trace: &mut SearchTrace,
) -> Result<Vec<NodeId>> {
    if matching.vertex_count() != graph.vertex_count() {
        return Err(AlgorithmError::invariant(format!(
            "matching covers {} vertices but the graph has {}",
            matching.vertex_count(),
            graph.vertex_count()
        )));
    }

    search(graph, matching, config, 0, trace)
}

fn search(
    graph: &Graph,
    matching: &Matching,
    config: &MatchingConfig,
    depth: usize,
    trace: &mut SearchTrace,
) -> Result<Vec<NodeId>> {
    let n = graph.vertex_count();
    let order = config.exploration_order.sequence(n);

    let mut forest = AlternatingForest::new(n);
    for &v in &order {
        if matching.is_exposed(v) {
            forest.add(v, None)?;
        }
    }

    let mut edges = EdgeMarks::new(graph, matching);
    let mut scanned = vec![false; n];

    while let Some(v) = next_outer_vertex(&forest, &order, &scanned)? {
        for &w in &order {
            if !edges.is_unmarked(v, w) {
                continue;
            }

            if !forest.contains(w) {
                match matching.mate_of(w) {
                    None => {
                        let mut path = forest.path_to_root(v)?;
                        path.reverse();
                        path.push(w);
                        return Ok(path);
                    }
                    Some(partner) => {
                        forest.add(w, Some(v))?;
                        forest.add(partner, Some(w))?;
                    }
                }
            } else if forest.is_outer(w)? {
                if forest.root_of(v)? != forest.root_of(w)? {
                    let mut path = forest.path_to_root(v)?;
                    path.reverse();
                    path.extend(forest.path_to_root(w)?);
                    return Ok(path);
                }

                let blossom = Blossom::from_forest(&forest, v, w)?;
                return descend(graph, matching, config, depth, trace, blossom);
            }

            edges.mark(v, w);
        }

        scanned[v] = true;
    }

    Ok(Vec::new())
}

/// First outer forest vertex in exploration order that still has to be scanned
fn next_outer_vertex(
    forest: &AlternatingForest,
    order: &[NodeId],
    scanned: &[bool],
) -> Result<Option<NodeId>> {
    for &v in order {
        if !scanned[v] && forest.contains(v) && forest.is_outer(v)? {
            return Ok(Some(v));
        }
    }
    Ok(None)
}

/// Contracts `blossom`, searches the contracted instance, lifts the result
fn descend(
    graph: &Graph,
    matching: &Matching,
    config: &MatchingConfig,
    depth: usize,
    trace: &mut SearchTrace,
    blossom: Blossom,
) -> Result<Vec<NodeId>> {
    debug!(
        "blossom {:?} with base {} found at depth {}",
        blossom.vertices(),
        blossom.base(),
        depth
    );

    let (contracted_graph, contracted_matching) = contract_blossom(&blossom, graph, matching)?;

    let live_before = graph.live_vertex_count();
    let live_after = contracted_graph.live_vertex_count();
    if live_after >= live_before {
        return Err(AlgorithmError::invariant(format!(
            "contracting {:?} left {} live vertices (was {})",
            blossom.vertices(),
            live_after,
            live_before
        )));
    }
    if depth + 1 > graph.vertex_count() / 2 + 1 {
        return Err(AlgorithmError::invariant(format!(
            "contraction depth {} exceeds the bound for {} vertices",
            depth + 1,
            graph.vertex_count()
        )));
    }

    trace.blossoms_contracted += 1;
    trace.deepest_recursion = trace.deepest_recursion.max(depth + 1);
    trace!(
        "descending to depth {} with {} live vertices",
        depth + 1,
        live_after
    );

    let contracted_path = search(
        &contracted_graph,
        &contracted_matching,
        config,
        depth + 1,
        trace,
    )?;

    lift_augmenting_path(&contracted_path, &blossom, graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::matching::ExplorationOrder;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn graph(n: usize, edges: &[(NodeId, NodeId)]) -> Graph {
        Graph::from_edges(n, edges.iter().copied()).unwrap()
    }

    /// Non-matching / matching alternation between two distinct exposed ends
    fn assert_augmenting(graph: &Graph, matching: &Matching, path: &[NodeId]) {
        assert!(path.len() >= 2 && path.len() % 2 == 0, "bad length: {:?}", path);
        assert!(matching.is_exposed(path[0]));
        assert!(matching.is_exposed(path[path.len() - 1]));

        let mut seen = path.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), path.len(), "repeated vertex in {:?}", path);

        for (j, pair) in path.windows(2).enumerate() {
            assert!(graph.adjacent(pair[0], pair[1]), "{:?} is not an edge", pair);
            assert_eq!(matching.contains_pair(pair[0], pair[1]), j % 2 == 1);
        }
    }

    /// The 19-vertex worked example: a long stem with a 5-cycle 11-17-18-19-12
    fn worked_example() -> (Graph, Matching) {
        let g = graph(
            20,
            &[
                (0, 1), (1, 2), (2, 3), (3, 4), (4, 5),
                (5, 6), (4, 7), (7, 8), (4, 9), (9, 10),
                (10, 11), (11, 12), (12, 13), (13, 14), (12, 15),
                (15, 16), (11, 17), (17, 18), (18, 19), (19, 12),
            ],
        );
        let matching = Matching::from_pairs(
            &g,
            [
                (0, 1), (3, 4), (5, 6), (7, 8), (9, 10),
                (11, 17), (18, 19), (12, 13), (15, 16),
            ],
        )
        .unwrap();
        (g, matching)
    }

    #[test]
    fn test_path_graph_augmenting_path() {
        init();
        let g = graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        let matching = Matching::from_pairs(&g, [(1, 2), (3, 4)]).unwrap();

        let path = find_augmenting_path(&g, &matching, &MatchingConfig::default()).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_worked_example() {
        init();
        let (g, matching) = worked_example();

        let path = find_augmenting_path(&g, &matching, &MatchingConfig::default()).unwrap();
        assert_eq!(path, vec![2, 3, 4, 9, 10, 11, 17, 18, 19, 12, 13, 14]);
        assert_augmenting(&g, &matching, &path);
    }

    #[test]
    fn test_worked_example_descending_order() {
        init();
        let (g, matching) = worked_example();
        let config = MatchingConfig {
            exploration_order: ExplorationOrder::Descending,
            ..MatchingConfig::default()
        };

        let path = find_augmenting_path(&g, &matching, &config).unwrap();
        assert_augmenting(&g, &matching, &path);
    }

    #[test]
    fn test_single_edge() {
        let g = graph(2, &[(0, 1)]);

        let path = find_augmenting_path(&g, &Matching::empty(2), &MatchingConfig::default()).unwrap();
        assert_eq!(path, vec![0, 1]);
    }

    #[test]
    fn test_no_edges_no_path() {
        let g = Graph::empty(5);

        let path = find_augmenting_path(&g, &Matching::empty(5), &MatchingConfig::default()).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_triangle_blossom_without_augmenting_path() {
        init();
        let g = graph(3, &[(0, 1), (1, 2), (2, 0)]);
        let matching = Matching::from_pairs(&g, [(0, 1)]).unwrap();
        let mut trace = SearchTrace::default();

        let path =
            find_augmenting_path_traced(&g, &matching, &MatchingConfig::default(), &mut trace)
                .unwrap();

        assert!(path.is_empty());
        assert_eq!(trace.blossoms_contracted, 1);
        assert_eq!(trace.deepest_recursion, 1);
    }

    #[test]
    fn test_path_through_contracted_triangle() {
        init();
        // triangle 0-1-2 with 0-1 matched; exposed 2 and 3; edge 1-3 leaves the triangle
        let g = graph(5, &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4), (2, 4)]);
        let matching = Matching::from_pairs(&g, [(0, 1)]).unwrap();
        let mut trace = SearchTrace::default();

        let path =
            find_augmenting_path_traced(&g, &matching, &MatchingConfig::default(), &mut trace)
                .unwrap();

        assert_eq!(path, vec![2, 1, 0, 3]);
        assert_augmenting(&g, &matching, &path);
        assert_eq!(trace.blossoms_contracted, 1);
    }

    #[test]
    fn test_five_cycle_with_stem_needs_contraction() {
        init();
        // root 6, stem 6-5=0, cycle 0-1=2-3=4-0, exit from the inner vertex 1 to 7
        let g = graph(
            8,
            &[(6, 5), (5, 0), (0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 7)],
        );
        let matching = Matching::from_pairs(&g, [(5, 0), (1, 2), (3, 4)]).unwrap();
        let mut trace = SearchTrace::default();

        let path =
            find_augmenting_path_traced(&g, &matching, &MatchingConfig::default(), &mut trace)
                .unwrap();

        assert_eq!(path, vec![6, 5, 0, 4, 3, 2, 1, 7]);
        assert_augmenting(&g, &matching, &path);
        assert_eq!(trace.blossoms_contracted, 1);
    }

    #[test]
    fn test_mismatched_matching_is_rejected() {
        let g = graph(3, &[(0, 1)]);

        let err = find_augmenting_path(&g, &Matching::empty(2), &MatchingConfig::default())
            .unwrap_err();
        assert!(err.is_invariant_violation());
    }
}
