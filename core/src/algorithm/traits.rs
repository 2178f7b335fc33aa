//! Core algorithm trait definitions for the blossom matching workspace
//!
//! This module establishes the shared vocabulary of the crate: vertex
//! identifiers, the error taxonomy every fallible operation reports through,
//! and the [`Algorithm`] trait that exposes a solver's identity, complexity
//! and string-keyed parameter protocol.
//!
//! # Error Taxonomy
//! - [`AlgorithmError::InvalidInput`]: the caller handed in a malformed graph
//!   or matching. Detected before any algorithmic work begins.
//! - [`AlgorithmError::InvariantViolation`]: an internal consistency check
//!   failed. Unreachable for valid input; the computation aborts rather than
//!   return a wrong matching.
//! - [`AlgorithmError::InvalidParameter`]: configuration rejected.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::data_structures::graph::Graph;

/// Vertex identifier. The vertices of an `n`-vertex graph are `0..n`.
pub type NodeId = usize;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Universal algorithm identifier for type-safe dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error types for graph construction, search and augmentation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl AlgorithmError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    /// True for errors that indicate a bug in the algorithm rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

/// Algorithm parameter with its current value and the values it accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub allowed_values: Vec<String>,
}

impl AlgorithmParameter {
    pub fn new(name: &str, value: &str, allowed_values: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            value: value.to_owned(),
            allowed_values: allowed_values.iter().map(|v| (*v).to_owned()).collect(),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.allowed_values.iter().any(|allowed| allowed == value)
    }
}

/// Algorithm complexity information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Main algorithm trait
///
/// # Invariants
/// - State isolation between runs: `execute` never reuses search state
/// - Deterministic behavior for given inputs and parameters
pub trait Algorithm: Debug + Send + Sync {
    /// Result produced by a successful run
    type Output;

    /// Returns the algorithm's unique identifier
    fn id(&self) -> AlgorithmId;

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., graph_matching)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's description
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<()>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// Verifies the algorithm can operate on the given graph
    fn is_compatible_with(&self, graph: &Graph) -> Result<()>;

    /// Runs the algorithm to completion
    fn execute(&mut self, graph: &Graph) -> Result<Self::Output>;
}
