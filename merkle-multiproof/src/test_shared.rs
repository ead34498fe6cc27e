use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::digest::Digest;

/// Flip the least significant bit of the digest's first byte.
pub(crate) fn corrupt_digest(digest: Digest) -> Digest {
    let mut bytes = digest.bytes();
    bytes[0] ^= 1;
    Digest::new(bytes)
}

pub(crate) fn random_leaves(num_leaves: usize, seed: u64) -> Vec<Digest> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_leaves).map(|_| rng.random()).collect()
}
