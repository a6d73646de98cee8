// crates/lotto_core/src/rng.rs
//
// Deterministic 32-bit stream used to shuffle ticket slots.
//
// Focus: bit-exact reproducibility of the historical slot order and stable
// seeding through `SeedableRng`. The generator is Mulberry32 (a 32-bit
// add/xorshift/multiply mixer). It is fast and NOT cryptographically secure;
// only its seed is hash-derived (see `lotto_algo::sequence::derive_seed`).
//
// Floats are produced as `u32 / 2^32`, which lands in [0, 1) exactly, so the
// shuffle below reproduces the float-driven Fisher–Yates of existing rounds.

use rand_core::{impls, Error, RngCore, SeedableRng};

const GOLDEN_GAMMA_32: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Mulberry32 generator.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Construct from a 32-bit seed (used as the initial state verbatim).
    #[inline]
    pub fn from_seed_u32(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next float in `[0, 1)`.
    #[inline]
    pub fn next_unit_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// `floor(u * bound)` for the next unit float `u`. Returns `None` if `bound == 0`.
    #[inline]
    pub fn gen_index(&mut self, bound: usize) -> Option<usize> {
        if bound == 0 {
            return None;
        }
        let j = (self.next_unit_f64() * bound as f64).floor() as usize;
        Some(j.min(bound - 1))
    }

    /// Deterministic in-place Fisher–Yates shuffle.
    ///
    /// for i in (1..len).rev() { j = floor(u * (i + 1)); swap(i, j) }
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let Some(j) = self.gen_index(i + 1) else { return };
            slice.swap(i, j);
        }
    }
}

impl RngCore for Mulberry32 {
    /// Advance the state and mix one output word.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA_32);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    /// Four seed bytes, read big-endian (the first four bytes of a digest).
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_seed_u32(u32::from_be_bytes(seed))
    }
}

// ------------------------------
// Tests (determinism & basics)
// ------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    /// `true` when `rng` sits `n` words past a fresh generator seeded with `seed`.
    fn drew(rng: &Mulberry32, seed: u32, n: usize) -> bool {
        let mut fresh = Mulberry32::from_seed_u32(seed);
        for _ in 0..n {
            fresh.next_u32();
        }
        rng.clone().next_u32() == fresh.next_u32()
    }

    #[test]
    fn known_words_from_zero_seed() {
        let mut rng = Mulberry32::from_seed_u32(0);
        assert_eq!(rng.next_u32(), 1_144_304_738);
        assert_eq!(rng.next_u32(), 1_416_247);
        assert_eq!(rng.next_u32(), 958_946_056);
        assert!(drew(&rng, 0, 3));
    }

    #[test]
    fn unit_floats_match_reference_stream() {
        let mut rng = Mulberry32::from_seed_u32(0xDEAD_BEEF);
        assert_eq!(rng.next_unit_f64(), 0.9413696140982211);
        assert_eq!(rng.next_unit_f64(), 0.26719574979506433);
    }

    #[test]
    fn seed_bytes_are_big_endian() {
        let mut a = Mulberry32::from_seed([0xDE, 0xAD, 0xBE, 0xEF]);
        let mut b = Mulberry32::from_seed_u32(0xDEAD_BEEF);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn gen_index_zero_none() {
        let mut rng = Mulberry32::from_seed_u32(7);
        assert_eq!(rng.gen_index(0), None);
        assert!(drew(&rng, 7, 0));
    }

    #[test]
    fn shuffle_is_deterministic_permutation() {
        let mut a = Mulberry32::from_seed_u32(42);
        let mut b = Mulberry32::from_seed_u32(42);
        let mut xs = (0..64u32).collect::<Vec<_>>();
        let mut ys = (0..64u32).collect::<Vec<_>>();
        a.shuffle_in_place(&mut xs);
        b.shuffle_in_place(&mut ys);
        assert_eq!(xs, ys);
        assert!(drew(&a, 42, 63));

        let mut sorted = xs.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64u32).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_trivial_lengths_draw_nothing() {
        let mut rng = Mulberry32::from_seed_u32(1);
        let mut empty: [u8; 0] = [];
        let mut one = [9u8];
        rng.shuffle_in_place(&mut empty);
        rng.shuffle_in_place(&mut one);
        assert_eq!(one, [9]);
        assert!(drew(&rng, 1, 0));
    }
}
