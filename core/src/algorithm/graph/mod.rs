//! Graph matching algorithms
//!
//! - [`augmenting`]: alternating-forest search for augmenting paths
//! - [`blossom`]: odd-cycle contraction and path lifting
//! - [`matching`]: augmentation and the maximum-matching driver

pub mod augmenting;
pub mod blossom;
pub mod matching;

pub use self::augmenting::{find_augmenting_path, SearchTrace};
pub use self::blossom::{contract_blossom, lift_augmenting_path, Blossom};
pub use self::matching::{
    augment_matching, EdmondsMatching, ExplorationOrder, MatchingConfig, MatchingStatistics,
    VerificationLevel,
};
