//! Seeded slot sequence: a reproducible permutation of `[0, size)`.
//!
//! Two independent halves:
//! - **Seed derivation** (`seed_key`, `derive_seed`): the scalar is the total
//!   score, or `floor(0.8 * capacity)` once the tier is saturated, so every
//!   saturated total of a tier shares one seed family. The key is the decimal
//!   scalar followed by the decimal block number; the seed is the first four
//!   bytes of SHA-256(key), big-endian.
//! - **Stream generation**: `Mulberry32` from that seed drives a Fisher–Yates
//!   shuffle of the identity permutation.

use lotto_core::Mulberry32;
use rand_core::SeedableRng;
use sha2::{Digest, Sha256};

use crate::capacity::{Tier, SATURATION_RATIO};

/// Scalar that identifies the seed family of `sum`.
fn seed_scalar(sum: f64) -> f64 {
    let tier = Tier::for_total(sum);
    let scalar = if tier.saturates(sum) {
        (f64::from(tier.capacity()) * SATURATION_RATIO).floor()
    } else {
        sum
    };
    // Render -0 as "0".
    if scalar == 0.0 { 0.0 } else { scalar }
}

/// Seed key: decimal scalar immediately followed by the decimal block number.
pub fn seed_key(sum: f64, block: u64) -> String {
    format!("{}{}", render_scalar(seed_scalar(sum)), block)
}

/// Shortest round-trip decimal, switching to exponent form (`1.1e-7`,
/// `1e+21`) outside `[1e-6, 1e21)` in magnitude, as existing seed keys do.
fn render_scalar(x: f64) -> String {
    let mag = x.abs();
    if x == 0.0 || (1e-6..1e21).contains(&mag) {
        return x.to_string();
    }
    let s = format!("{x:e}");
    match s.split_once('e') {
        Some((mant, exp)) if !exp.starts_with('-') => format!("{mant}e+{exp}"),
        _ => s,
    }
}

/// First four bytes of SHA-256(seed key).
pub fn seed_bytes(sum: f64, block: u64) -> [u8; 4] {
    let digest = Sha256::digest(seed_key(sum, block).as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// `seed_bytes` read big-endian; the value recorded with each pool.
pub fn derive_seed(sum: f64, block: u64) -> u32 {
    u32::from_be_bytes(seed_bytes(sum, block))
}

/// Deterministic permutation of `[0, size)` for `(sum, block)`.
pub fn generate_sequence(sum: f64, block: u64, size: usize) -> Vec<u32> {
    let mut rng = Mulberry32::from_seed(seed_bytes(sum, block));
    let mut seq: Vec<u32> = (0..size as u32).collect();
    rng.shuffle_in_place(&mut seq);
    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_raw_sum_below_target() {
        assert_eq!(seed_key(1_000.0, 100), "1000100");
        assert_eq!(seed_key(300.0, 1), "3001");
        assert_eq!(seed_key(50_000.0, 12_345), "5000012345");
        assert_eq!(seed_key(1.5, 7), "1.57");
        assert_eq!(seed_key(0.0, 5), "05");
        assert_eq!(seed_key(-0.0, 5), "05");
    }

    #[test]
    fn key_uses_exponent_form_at_the_extremes() {
        assert_eq!(seed_key(1.1e-7, 1), "1.1e-71");
        assert_eq!(seed_key(1e-7, 2), "1e-72");
        assert_eq!(seed_key(1e-6, 3), "0.0000013");
        assert_eq!(seed_key(-2.5e-9, 4), "-2.5e-94");
        assert_eq!(seed_key(-1e21, 5), "-1e+215");
        assert_eq!(seed_key(-1.5e20, 6), "-1500000000000000000006");
    }

    #[test]
    fn key_canonicalizes_saturated_totals() {
        assert_eq!(seed_key(800.0, 3), "8003");
        assert_eq!(seed_key(900.0, 3), "8003");
        assert_eq!(seed_key(9_000.0, 3), "80003");
        assert_eq!(seed_key(80_000.0, 1), "800001");
        assert_eq!(seed_key(250_000.0, 1), "800001");
    }

    #[test]
    fn seed_is_first_four_digest_bytes() {
        assert_eq!(derive_seed(1_000.0, 100), 3_836_287_354);
        assert_eq!(derive_seed(50_000.0, 12_345), 378_613_678);
        assert_eq!(derive_seed(90_000.0, 1), derive_seed(80_000.0, 1));
        assert_eq!(seed_bytes(1_000.0, 100), 3_836_287_354u32.to_be_bytes());
    }

    #[test]
    fn reference_permutations() {
        assert_eq!(generate_sequence(1_000.0, 100, 10), vec![3, 1, 5, 8, 6, 9, 2, 4, 7, 0]);
        assert_eq!(generate_sequence(300.0, 12_345, 8), vec![0, 4, 1, 5, 3, 7, 2, 6]);
        assert_eq!(generate_sequence(0.0, 5, 5), vec![2, 3, 0, 1, 4]);
        assert_eq!(
            generate_sequence(50_000.0, 12_345, 12),
            vec![11, 2, 9, 8, 4, 7, 0, 1, 3, 6, 10, 5]
        );
        assert_eq!(
            generate_sequence(1_000.0, 100, 1_000)[..8],
            [424, 625, 271, 815, 334, 997, 840, 342]
        );
    }

    #[test]
    fn empty_and_singleton() {
        assert!(generate_sequence(1_000.0, 100, 0).is_empty());
        assert_eq!(generate_sequence(1_000.0, 100, 1), vec![0]);
    }

    #[test]
    fn deterministic_and_block_sensitive() {
        let a = generate_sequence(1_000.0, 100, 1_000);
        let b = generate_sequence(1_000.0, 100, 1_000);
        let c = generate_sequence(1_000.0, 101, 1_000);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
