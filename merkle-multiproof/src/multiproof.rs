use arbitrary::Arbitrary;
use get_size2::GetSize;
use serde::Deserialize;
use serde::Serialize;

use crate::digest::Digest;
use crate::error::MultiproofError;
use crate::hasher::MerkleHasher;
use crate::known_queue::KnownQueue;

/// A proof that a subset of the leaves of a [`MerkleTree`][tree] belongs to
/// the tree with a given root.
///
/// Verification runs one hashing step per flag. Each step takes the next known
/// digest, where the `leaves` are known first and the digests computed by
/// earlier steps after them, and combines it with a second operand. If the
/// step's flag is `true`, the second operand is the next known digest too;
/// otherwise, it is the next digest from `proof`. Every computed digest is
/// appended to the known digests. The root is whatever remains.
///
/// The leaves must be listed in the order in which they appear in the tree.
/// A well-formed multiproof satisfies
/// `flags.len() == proof.len() + leaves.len() - 1`.
///
/// [tree]: crate::merkle_tree::MerkleTree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Arbitrary, GetSize)]
pub struct Multiproof {
    /// The leaves being authenticated, in tree order.
    pub leaves: Vec<Digest>,

    /// The sibling digests that cannot be derived from the leaves, in the
    /// order they are needed.
    pub proof: Vec<Digest>,

    /// One flag per hashing step; `true` if the step's second operand is
    /// known, `false` if it is taken from the proof.
    pub flags: Vec<bool>,
}

impl Multiproof {
    /// See [`verify_multiproof`].
    pub fn verify<H: MerkleHasher>(&self, root: Digest) -> Result<bool, MultiproofError> {
        verify_multiproof::<H>(root, &self.leaves, &self.proof, &self.flags)
    }

    /// See [`ensure_multiproof`].
    pub fn ensure_valid<H: MerkleHasher>(&self, root: Digest) -> Result<(), MultiproofError> {
        ensure_multiproof::<H>(root, &self.leaves, &self.proof, &self.flags)
    }

    /// The root this multiproof authenticates its leaves against.
    pub fn derive_root<H: MerkleHasher>(&self) -> Result<Digest, MultiproofError> {
        derive_root::<H>(&self.leaves, &self.proof, &self.flags)
    }
}

/// Verify that `leaves` are part of the Merkle tree with root `root`.
///
/// Returns `Ok(false)` if the multiproof is well-formed but authenticates the
/// leaves against some other root.
///
/// # Errors
///
/// Returns an error if the multiproof is malformed:
/// - if there are no leaves
/// - if the number of flags does not match the number of leaves and proof
///   digests
/// - if a flag demands an operand that is not available
pub fn verify_multiproof<H: MerkleHasher>(
    root: Digest,
    leaves: &[Digest],
    proof: &[Digest],
    flags: &[bool],
) -> Result<bool, MultiproofError> {
    let derived_root = derive_root::<H>(leaves, proof, flags)?;
    let is_valid = derived_root == root;
    if !is_valid {
        tracing::debug!(%root, %derived_root, "multiproof authenticates a different root");
    }

    Ok(is_valid)
}

/// Like [`verify_multiproof`], but treats a root mismatch as an error, too.
pub fn ensure_multiproof<H: MerkleHasher>(
    root: Digest,
    leaves: &[Digest],
    proof: &[Digest],
    flags: &[bool],
) -> Result<(), MultiproofError> {
    if verify_multiproof::<H>(root, leaves, proof, flags)? {
        Ok(())
    } else {
        Err(MultiproofError::RootMismatch)
    }
}

fn derive_root<H: MerkleHasher>(
    leaves: &[Digest],
    proof: &[Digest],
    flags: &[bool],
) -> Result<Digest, MultiproofError> {
    let derived_root = reduce::<H>(leaves, proof, flags);
    if let Err(err) = &derived_root {
        tracing::debug!(
            %err,
            num_leaves = leaves.len(),
            num_proof_digests = proof.len(),
            num_flags = flags.len(),
            "rejected malformed multiproof"
        );
    }

    derived_root
}

fn reduce<H: MerkleHasher>(
    leaves: &[Digest],
    proof: &[Digest],
    flags: &[bool],
) -> Result<Digest, MultiproofError> {
    if leaves.is_empty() {
        return Err(MultiproofError::NoLeaves);
    }
    let expected_num_flags = leaves.len() + proof.len() - 1;
    if flags.len() != expected_num_flags {
        return Err(MultiproofError::FlagCountMismatch {
            expected: expected_num_flags,
            num_flags: flags.len(),
            num_leaves: leaves.len(),
            num_proof_digests: proof.len(),
        });
    }

    let mut known_digests = KnownQueue::new(leaves, flags.len());
    let mut proof_digests = proof.iter().copied();
    for (flag_index, &sibling_is_known) in flags.iter().enumerate() {
        let known_queue_exhausted = MultiproofError::KnownQueueExhausted { flag_index };
        let node = known_digests.pop_front().ok_or(known_queue_exhausted)?;
        let sibling = if sibling_is_known {
            known_digests.pop_front().ok_or(known_queue_exhausted)?
        } else {
            proof_digests
                .next()
                .ok_or(MultiproofError::ProofExhausted { flag_index })?
        };
        known_digests.push_back(H::combine(node, sibling));
    }

    // Every step leaves at least one known digest behind. With a matching flag
    // count, completing all steps implies that exactly one known digest
    // remains and that the proof is used up.
    debug_assert_eq!(1, known_digests.len());
    debug_assert_eq!(0, proof_digests.len());
    known_digests
        .pop_front()
        .ok_or(MultiproofError::KnownQueueExhausted {
            flag_index: flags.len(),
        })
}
