pub use sha3::Keccak256;
pub use sha3::Sha3_256;

pub use crate::digest::Digest;
pub use crate::error::MerkleTreeError;
pub use crate::error::MultiproofError;
pub use crate::hasher::MerkleHasher;
pub use crate::merkle_tree::CpuParallel;
pub use crate::merkle_tree::MerkleTree;
pub use crate::merkle_tree::MerkleTreeMaker;
pub use crate::multiproof::Multiproof;
pub use crate::multiproof::ensure_multiproof;
pub use crate::multiproof::verify_multiproof;
