/// The first-in first-out queue of known nodes driving a multiproof reduction.
///
/// It is seeded with the subset being proven, in leaf order. Every node derived
/// during the reduction is appended to the back. Seed elements are always
/// consumed before derived ones, which is what makes a queue state fully
/// determined by the number of elements pushed and popped so far.
///
/// The prover runs it over tree positions, the verifier over digests.
#[derive(Debug, Clone)]
pub(crate) struct KnownQueue<'seed, T> {
    seed: &'seed [T],
    seed_position: usize,
    derived: Vec<T>,
    derived_position: usize,
}

impl<'seed, T: Copy> KnownQueue<'seed, T> {
    pub fn new(seed: &'seed [T], expected_num_derived: usize) -> Self {
        Self {
            seed,
            seed_position: 0,
            derived: Vec::with_capacity(expected_num_derived),
            derived_position: 0,
        }
    }

    pub fn front(&self) -> Option<T> {
        self.seed
            .get(self.seed_position)
            .or_else(|| self.derived.get(self.derived_position))
            .copied()
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if let Some(&element) = self.seed.get(self.seed_position) {
            self.seed_position += 1;
            return Some(element);
        }

        let element = self.derived.get(self.derived_position).copied()?;
        self.derived_position += 1;
        Some(element)
    }

    pub fn push_back(&mut self, element: T) {
        self.derived.push(element);
    }

    pub fn len(&self) -> usize {
        (self.seed.len() - self.seed_position) + (self.derived.len() - self.derived_position)
    }
}
