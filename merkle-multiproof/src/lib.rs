#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![deny(clippy::shadow_unrelated)]

//! Merkle trees over commutatively hashed digests, together with compact
//! multiproofs: a single proof that authenticates an arbitrary subset of the
//! leaves.
//!
//! The [prover](merkle_tree::MerkleTree::multiproof) and the
//! [verifier](multiproof::verify_multiproof) run the same queue reduction. The
//! verifier only needs the claimed root, the subset, the proof digests, and one
//! flag per hash, which makes it suitable for constrained environments that
//! never see the full tree.
//!
//! ```
//! use merkle_multiproof::prelude::*;
//!
//! let leaves = ["a", "b", "c", "d", "e", "f"].map(|s| Keccak256::hash_leaf(s.as_bytes()));
//! let tree = MerkleTree::<Keccak256>::new_sorted(&leaves).unwrap();
//!
//! let multiproof = tree.multiproof(&[leaves[1], leaves[3], leaves[5]]).unwrap();
//! assert_eq!(Ok(true), multiproof.verify::<Keccak256>(tree.root()));
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod hasher;
pub mod merkle_tree;
pub mod multiproof;
pub mod prelude;

pub(crate) mod known_queue;

#[cfg(test)]
pub(crate) mod test_shared;
