use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use itertools::Itertools;
use rayon::prelude::*;

use crate::config::merkle_tree_parallelization_cutoff;
use crate::digest::Digest;
use crate::error::MerkleTreeError;
use crate::hasher::MerkleHasher;
use crate::known_queue::KnownQueue;
use crate::multiproof::Multiproof;

/// A Merkle tree over an arbitrary, non-zero number of leaves, using the
/// commutative [`MerkleHasher::combine`] to hash pairs of nodes.
///
/// Level 0 holds the leaves in the order they were given. Every further level
/// holds the combined digests of consecutive pairs of the level below. If a
/// level has an odd number of nodes, its last node has no sibling. It is
/// carried to the next level unchanged and placed at the *front* of that level.
/// Writing `ab` for `combine(a, b)`, the tree of five leaves is:
///
/// ```markdown
/// level 0: [a, b, c, d, e]
/// level 1: [e, ab, cd]
/// level 2: [cd, e_ab]
/// level 3: [cd_e_ab]
/// ```
///
/// Putting the carried node first keeps the nodes of every level in the same
/// order in which a [multiproof](Self::multiproof) reduction encounters them,
/// which is what makes every subset of leaves provable.
///
/// The tree does not sort its leaves. Use [`MerkleTree::new_sorted`] to build
/// the canonical tree of a leaf multiset.
pub struct MerkleTree<H> {
    levels: Vec<Vec<Digest>>,
    _hasher: PhantomData<H>,
}

impl<H> Clone for MerkleTree<H> {
    fn clone(&self) -> Self {
        Self {
            levels: self.levels.clone(),
            _hasher: PhantomData,
        }
    }
}

impl<H> PartialEq for MerkleTree<H> {
    fn eq(&self, other: &Self) -> bool {
        self.levels == other.levels
    }
}

impl<H> Eq for MerkleTree<H> {}

impl<H> fmt::Debug for MerkleTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("levels", &self.levels)
            .finish()
    }
}

/// The position of a node in a [`MerkleTree`]: its level, counted from the
/// leaves, and its index within that level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodePosition {
    pub level: usize,
    pub index: usize,
}

impl NodePosition {
    pub const fn leaf(index: usize) -> Self {
        Self { level: 0, index }
    }

    pub const fn sibling(self) -> Self {
        Self {
            level: self.level,
            index: self.index ^ 1,
        }
    }
}

/// Builds [`MerkleTree`]s.
pub trait MerkleTreeMaker<H: MerkleHasher> {
    /// Build a Merkle tree with the given digests as its leaves, in the given
    /// order.
    fn from_digests(digests: &[Digest]) -> Result<MerkleTree<H>, MerkleTreeError>;
}

/// Builds a [`MerkleTree`] level by level, hashing the pairs of a level in
/// parallel once the level is at least as large as the configured
/// [cutoff](crate::config::set_merkle_tree_parallelization_cutoff).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CpuParallel;

impl<H: MerkleHasher> MerkleTreeMaker<H> for CpuParallel {
    fn from_digests(digests: &[Digest]) -> Result<MerkleTree<H>, MerkleTreeError> {
        if digests.is_empty() {
            return Err(MerkleTreeError::EmptyTree);
        }

        let cutoff = merkle_tree_parallelization_cutoff();
        let mut levels = vec![digests.to_vec()];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next_level = Self::next_level::<H>(level, cutoff);
            levels.push(next_level);
        }

        tracing::trace!(
            num_leaves = digests.len(),
            height = levels.len() - 1,
            "built Merkle tree"
        );

        Ok(MerkleTree {
            levels,
            _hasher: PhantomData,
        })
    }
}

impl CpuParallel {
    fn next_level<H: MerkleHasher>(level: &[Digest], cutoff: usize) -> Vec<Digest> {
        let pairs = level.chunks_exact(2);
        let carried_node = pairs.remainder().first().copied();

        let mut next_level = Vec::with_capacity(level.len().div_ceil(2));
        next_level.extend(carried_node);
        if level.len() >= cutoff {
            let hashed_pairs = level
                .par_chunks_exact(2)
                .map(|pair| H::combine(pair[0], pair[1]));
            next_level.par_extend(hashed_pairs);
        } else {
            next_level.extend(pairs.map(|pair| H::combine(pair[0], pair[1])));
        }

        next_level
    }
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Build a Merkle tree with the given leaves, in the given order.
    pub fn new(leaves: &[Digest]) -> Result<Self, MerkleTreeError> {
        CpuParallel::from_digests(leaves)
    }

    /// Build the Merkle tree of the given leaves after sorting them byte-wise
    /// ascending. The root only depends on the multiset of leaves.
    pub fn new_sorted(leaves: &[Digest]) -> Result<Self, MerkleTreeError> {
        let mut sorted_leaves = leaves.to_vec();
        sorted_leaves.sort_unstable();
        Self::new(&sorted_leaves)
    }

    /// Verify that `leaf` is part of the tree with root `root`, using an
    /// authentication path as produced by [`MerkleTree::authentication_path`].
    pub fn verify_authentication_path(root: Digest, leaf: Digest, path: &[Digest]) -> bool {
        let derived_root = path
            .iter()
            .fold(leaf, |node, &sibling| H::combine(node, sibling));
        derived_root == root
    }

    /// The multiproof for the given leaves.
    ///
    /// The leaves need not be sorted. A digest that occurs more than once in
    /// the tree can be requested as many times as it occurs; the k-th request
    /// refers to the k-th occurrence.
    ///
    /// # Errors
    ///
    /// - if no leaves are requested
    /// - if a requested leaf is not in the tree, or is requested more often than
    ///   it occurs
    pub fn multiproof(&self, leaves: &[Digest]) -> Result<Multiproof, MerkleTreeError> {
        if leaves.is_empty() {
            return Err(MerkleTreeError::EmptySubset);
        }

        let occurrences = self
            .leaves()
            .iter()
            .copied()
            .enumerate()
            .map(|(index, leaf)| (leaf, index))
            .into_group_map();
        let mut num_claimed = HashMap::<Digest, usize>::new();
        let mut leaf_indices = Vec::with_capacity(leaves.len());
        for &leaf in leaves {
            let num_claimed_of_leaf = num_claimed.entry(leaf).or_default();
            let Some(&leaf_index) = occurrences
                .get(&leaf)
                .and_then(|indices| indices.get(*num_claimed_of_leaf))
            else {
                return Err(MerkleTreeError::LeafNotFound(leaf));
            };
            *num_claimed_of_leaf += 1;
            leaf_indices.push(leaf_index);
        }

        self.multiproof_for_leaf_indices(&leaf_indices)
    }

    /// The multiproof for the leaves at the given indices. The indices need not
    /// be sorted; repeated indices are proven once.
    ///
    /// # Errors
    ///
    /// - if no indices are given
    /// - if any index is out of bounds
    pub fn multiproof_for_leaf_indices(
        &self,
        leaf_indices: &[usize],
    ) -> Result<Multiproof, MerkleTreeError> {
        if leaf_indices.is_empty() {
            return Err(MerkleTreeError::EmptySubset);
        }
        let num_leaves = self.num_leaves();
        if let Some(&index) = leaf_indices.iter().find(|&&index| index >= num_leaves) {
            return Err(MerkleTreeError::LeafIndexOutOfBounds { index, num_leaves });
        }

        let leaf_positions = leaf_indices
            .iter()
            .copied()
            .sorted_unstable()
            .dedup()
            .map(NodePosition::leaf)
            .collect_vec();

        let mut known_nodes = KnownQueue::new(&leaf_positions, leaf_positions.len());
        let mut proof = vec![];
        let mut flags = vec![];
        while let Some(node) = known_nodes.pop_front() {
            let node = self.lift_carried_node(node);
            if node.level == self.height() {
                debug_assert_eq!(0, known_nodes.len(), "root must be the last known node");
                break;
            }

            let sibling = node.sibling();
            let sibling_is_known =
                known_nodes.front().map(|next| self.lift_carried_node(next)) == Some(sibling);
            if sibling_is_known {
                known_nodes.pop_front();
            } else {
                proof.push(self.node(sibling));
            }
            flags.push(sibling_is_known);
            known_nodes.push_back(self.parent(node));
        }

        let leaves = leaf_positions.iter().map(|&leaf| self.node(leaf)).collect();
        let multiproof = Multiproof {
            leaves,
            proof,
            flags,
        };
        tracing::trace!(
            num_leaves = multiproof.leaves.len(),
            num_proof_digests = multiproof.proof.len(),
            num_flags = multiproof.flags.len(),
            "generated multiproof"
        );
        debug_assert_eq!(Ok(self.root()), multiproof.derive_root::<H>());

        Ok(multiproof)
    }
}

impl<H> MerkleTree<H> {
    pub fn root(&self) -> Digest {
        self.levels[self.height()][0]
    }

    /// The number of levels above the leaves. A tree with a single leaf has
    /// height 0.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn num_leaves(&self) -> usize {
        self.levels[0].len()
    }

    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    pub fn leaf(&self, index: usize) -> Option<Digest> {
        self.leaves().get(index).copied()
    }

    /// The index of the first leaf equal to `leaf`, if any.
    pub fn leaf_index(&self, leaf: Digest) -> Option<usize> {
        self.leaves().iter().position(|&l| l == leaf)
    }

    /// All levels of the tree, starting with the leaves and ending with the
    /// level that holds only the root.
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// The siblings of all nodes on the path from the indicated leaf to the
    /// root, bottom-up. Levels on which the node is carried contribute nothing,
    /// so the path can be shorter than the tree's height.
    ///
    /// ```markdown
    ///         root
    ///        /    \
    ///       c      h0
    ///             /  \
    ///  c         a    b
    /// ```
    ///
    /// The authentication path for `a` (index: 0) is `vec![b, c]`, the one for
    /// `c` (index: 2) is `vec![h0]`.
    pub fn authentication_path(&self, leaf_index: usize) -> Result<Vec<Digest>, MerkleTreeError> {
        let num_leaves = self.num_leaves();
        if leaf_index >= num_leaves {
            return Err(MerkleTreeError::LeafIndexOutOfBounds {
                index: leaf_index,
                num_leaves,
            });
        }

        let mut authentication_path = Vec::with_capacity(self.height());
        let mut node = self.lift_carried_node(NodePosition::leaf(leaf_index));
        while node.level < self.height() {
            authentication_path.push(self.node(node.sibling()));
            node = self.lift_carried_node(self.parent(node));
        }

        Ok(authentication_path)
    }

    pub(crate) fn node(&self, position: NodePosition) -> Digest {
        self.levels[position.level][position.index]
    }

    fn level_has_carried_node(&self, level: usize) -> bool {
        level < self.height() && self.levels[level].len() % 2 == 1
    }

    fn is_carried(&self, node: NodePosition) -> bool {
        self.level_has_carried_node(node.level) && node.index == self.levels[node.level].len() - 1
    }

    /// The position of the node that `node` is identical to, following it up
    /// through every level on which it has no sibling.
    fn lift_carried_node(&self, mut node: NodePosition) -> NodePosition {
        while self.is_carried(node) {
            node = NodePosition {
                level: node.level + 1,
                index: 0,
            };
        }
        node
    }

    /// The parent of a node that has a sibling.
    fn parent(&self, node: NodePosition) -> NodePosition {
        debug_assert!(!self.is_carried(node));
        let carried_node_offset = usize::from(self.level_has_carried_node(node.level));
        NodePosition {
            level: node.level + 1,
            index: carried_node_offset + node.index / 2,
        }
    }
}
