//! Trainer pairing by non-terminating thumb-wrestling games
//!
//! Every trainer holds a positive number of bananas. A game between counts
//! `(a, b)` with `a < b` moves to `(2a, b - a)` and stops once both counts are
//! equal. Two trainers are worth pairing when their game never stops, and the
//! quantity of interest is how many trainers are left over by the best
//! possible pairing: the number of exposed vertices of a maximum matching in
//! the graph whose edges are the non-terminating games.
//!
//! # Termination Rule
//! The total `s = a + b` never changes. With `g = gcd(a, b)` the game is
//! equivalent to `(a / g, b / g)` and one round doubles the smaller share
//! modulo `s / g`, so it terminates exactly when `s / g` is a power of two.

use log::debug;

use crate::algorithm::graph::matching::EdmondsMatching;
use crate::algorithm::traits::{AlgorithmError, Result};
use crate::data_structures::graph::Graph;

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// True when the game between `a` and `b` bananas never terminates
///
/// Both counts must be positive.
///
/// ```
/// use blossom_core::pairing::loops_forever;
///
/// assert!(loops_forever(1, 21));
/// assert!(!loops_forever(1, 7));
/// ```
pub fn loops_forever(a: u64, b: u64) -> bool {
    let (a, b) = (u128::from(a), u128::from(b));
    let g = gcd(a, b);
    if g == 0 {
        return false;
    }
    !((a + b) / g).is_power_of_two()
}

/// Pairing graph over the trainers: an edge joins every pair whose game
/// loops forever
pub fn pairing_graph(counts: &[u64]) -> Graph {
    Graph::from_predicate(counts.len(), |u, v| loops_forever(counts[u], counts[v]))
}

/// Number of trainers left unpaired by a maximum pairing
///
/// Fails with [`AlgorithmError::InvalidInput`] when a trainer holds no
/// bananas.
pub fn unpaired_count(counts: &[u64]) -> Result<usize> {
    if let Some(trainer) = counts.iter().position(|&count| count == 0) {
        return Err(AlgorithmError::invalid_input(format!(
            "trainer {} holds no bananas",
            trainer
        )));
    }

    let graph = pairing_graph(counts);
    debug!(
        "pairing graph for {} trainers has {} looping pairs",
        counts.len(),
        graph.edge_count()
    );

    let matching = EdmondsMatching::new().find_maximum_matching(&graph)?;
    Ok(counts.len() - 2 * matching.size())
}
