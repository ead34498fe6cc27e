//! Performance knobs. None of them influence roots or proofs.
//!
//! Options set here are per thread. Environment variables, where available,
//! take precedence over them.

use std::cell::Cell;

thread_local! {
    static PARALLELIZATION_CUTOFF: Cell<ParallelizationCutoff> =
        Cell::new(ParallelizationCutoff::resolve(None));
}

/// The smallest Merkle tree level, in nodes, whose pairs are hashed in
/// parallel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct ParallelizationCutoff(usize);

impl ParallelizationCutoff {
    const ENV_VAR: &'static str = "MERKLE_MULTIPROOF_PARALLELIZATION_CUTOFF";
    const DEFAULT: usize = 512;
    const MINIMUM: usize = 2;

    fn resolve(requested: Option<usize>) -> Self {
        let cutoff = Self::from_env()
            .or(requested)
            .unwrap_or(Self::DEFAULT)
            .max(Self::MINIMUM);
        Self(cutoff)
    }

    fn from_env() -> Option<usize> {
        let value = std::env::var(Self::ENV_VAR).ok()?;
        match value.trim().parse() {
            Ok(cutoff) => Some(cutoff),
            Err(err) => {
                tracing::warn!(%err, %value, "ignoring {}", Self::ENV_VAR);
                None
            }
        }
    }
}

/// Sets the size from which a Merkle tree level has its pairs hashed in
/// parallel.
///
/// With a cutoff of 512, a level of 511 nodes is hashed on the current thread
/// and a level of 512 nodes is spread over rayon's thread pool. Levels are
/// always built one after the other.
///
/// The environment variable `MERKLE_MULTIPROOF_PARALLELIZATION_CUTOFF`
/// overrides this setting. The default is 512. Values below 2 are raised to 2.
pub fn set_merkle_tree_parallelization_cutoff(cutoff: usize) {
    PARALLELIZATION_CUTOFF.set(ParallelizationCutoff::resolve(Some(cutoff)));
}

pub(crate) fn merkle_tree_parallelization_cutoff() -> usize {
    PARALLELIZATION_CUTOFF.get().0
}
