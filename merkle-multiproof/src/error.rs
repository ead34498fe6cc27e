use thiserror::Error;

use crate::digest::Digest;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum TryFromDigestError {
    #[error("expected {expected} bytes for digest, but got {0}", expected = Digest::BYTES)]
    InvalidLength(usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TryFromHexDigestError {
    #[error("hex decoding error")]
    HexDecode(#[from] hex::FromHexError),

    #[error("digest error")]
    Digest(#[from] TryFromDigestError),
}

/// Errors when building a [`MerkleTree`][tree] or deriving a
/// [`Multiproof`][proof] from it.
///
/// [tree]: crate::merkle_tree::MerkleTree
/// [proof]: crate::multiproof::Multiproof
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[non_exhaustive]
pub enum MerkleTreeError {
    #[error("a Merkle tree must have at least one leaf")]
    EmptyTree,

    #[error("a multiproof must authenticate at least one leaf")]
    EmptySubset,

    #[error("leaf {0} is not in the Merkle tree")]
    LeafNotFound(Digest),

    #[error("leaf index {index} is out of bounds for a tree with {num_leaves} leaves")]
    LeafIndexOutOfBounds { index: usize, num_leaves: usize },
}

/// Reasons a multiproof is rejected.
///
/// All variants but [`RootMismatch`](Self::RootMismatch) indicate a malformed
/// multiproof. A well-formed multiproof that authenticates against a different
/// root is not an error for [`verify_multiproof`][verify], only for
/// [`ensure_multiproof`][ensure].
///
/// [verify]: crate::multiproof::verify_multiproof
/// [ensure]: crate::multiproof::ensure_multiproof
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[non_exhaustive]
pub enum MultiproofError {
    #[error("a multiproof must authenticate at least one leaf")]
    NoLeaves,

    #[error(
        "expected {expected} flags for {num_leaves} leaves and {num_proof_digests} \
        proof digests, but got {num_flags}"
    )]
    FlagCountMismatch {
        expected: usize,
        num_flags: usize,
        num_leaves: usize,
        num_proof_digests: usize,
    },

    #[error("flag {flag_index} needs a known digest, but none is left")]
    KnownQueueExhausted { flag_index: usize },

    #[error("flag {flag_index} needs a proof digest, but none is left")]
    ProofExhausted { flag_index: usize },

    #[error("the derived root does not match the claimed root")]
    RootMismatch,
}
