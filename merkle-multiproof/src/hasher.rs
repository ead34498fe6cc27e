use sha3::Digest as _;
use sha3::Keccak256;
use sha3::Sha3_256;

use crate::digest::Digest;

/// A one-way compression function producing [`Digest`]s, used for hashing
/// leaf pre-images and for combining pairs of nodes in a Merkle tree.
///
/// Only [`hash_varlen`](Self::hash_varlen) has to be provided. The pair
/// hashing functions are derived from it and should not be overridden: the
/// prover and the verifier of a multiproof rely on [`combine`](Self::combine)
/// being commutative.
pub trait MerkleHasher: Send + Sync {
    /// Hash an arbitrary byte sequence.
    fn hash_varlen(input: &[u8]) -> Digest;

    /// Hash the pre-image of a leaf. Leaves handed to a
    /// [`MerkleTree`](crate::merkle_tree::MerkleTree) are expected to be
    /// hashed already; this is a convenience for doing so.
    fn hash_leaf(data: &[u8]) -> Digest {
        Self::hash_varlen(data)
    }

    /// Hash the concatenation `left || right`. Order-sensitive.
    fn hash_pair(left: Digest, right: Digest) -> Digest {
        let mut preimage = [0; 2 * Digest::BYTES];
        let (left_half, right_half) = preimage.split_at_mut(Digest::BYTES);
        left_half.copy_from_slice(&left.0);
        right_half.copy_from_slice(&right.0);
        Self::hash_varlen(&preimage)
    }

    /// Hash a pair of digests after sorting them byte-wise ascending, such that
    /// `combine(x, y) == combine(y, x)`.
    fn combine(x: Digest, y: Digest) -> Digest {
        if x <= y {
            Self::hash_pair(x, y)
        } else {
            Self::hash_pair(y, x)
        }
    }
}

impl MerkleHasher for Keccak256 {
    fn hash_varlen(input: &[u8]) -> Digest {
        digest_from_sha3_output(&Keccak256::digest(input))
    }
}

impl MerkleHasher for Sha3_256 {
    fn hash_varlen(input: &[u8]) -> Digest {
        digest_from_sha3_output(&Sha3_256::digest(input))
    }
}

fn digest_from_sha3_output(output: &[u8]) -> Digest {
    let mut bytes = [0; Digest::BYTES];
    bytes.copy_from_slice(output);
    Digest::new(bytes)
}
