//! Determinism utilities: the canonical entrant order.
//!
//! Map keys and both allocation passes depend on this order, so it must be a
//! **total** order for identical inputs:
//! - score descending,
//! - then address ascending (byte-lexicographic, case-sensitive).
//!
//! Entrants that compare equal (same address and score) are indistinguishable,
//! and the stable sort keeps their input order.

use core::cmp::Ordering;

use crate::entities::ScoreEntry;

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for ScoreEntry {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.address.as_str().cmp(other.address.as_str()))
    }
}

/// Compare two entrants by `(score ↓, address ↑)`.
#[inline]
pub fn cmp_entrants(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    a.stable_cmp(b)
}

/// Sort entrants **in place** into canonical order.
#[inline]
pub fn sort_entrants_canonical(xs: &mut [ScoreEntry]) {
    xs.sort_by(cmp_entrants);
}

/// Eligible entrants (`score > 0`) in canonical order. Duplicates are kept.
pub fn eligible_in_canonical_order(entrants: &[ScoreEntry]) -> Vec<ScoreEntry> {
    let mut out: Vec<ScoreEntry> = entrants.iter().filter(|e| e.is_eligible()).cloned().collect();
    sort_entrants_canonical(&mut out);
    out
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn addrs(xs: &[ScoreEntry]) -> Vec<&str> {
        xs.iter().map(|e| e.address.as_str()).collect()
    }

    #[test]
    fn score_desc_then_address_asc() {
        let mut v = vec![
            ScoreEntry::new("0xBBB", 1000.0),
            ScoreEntry::new("0xAAA", 1000.0),
            ScoreEntry::new("0xCCC", 2000.0),
        ];
        sort_entrants_canonical(&mut v);
        assert_eq!(addrs(&v), vec!["0xCCC", "0xAAA", "0xBBB"]);
    }

    #[test]
    fn address_order_is_case_sensitive_bytes() {
        let mut v = vec![
            ScoreEntry::new("0xabc", 1.0),
            ScoreEntry::new("0xAbC", 1.0),
            ScoreEntry::new("0xABC", 1.0),
        ];
        sort_entrants_canonical(&mut v);
        assert_eq!(addrs(&v), vec!["0xABC", "0xAbC", "0xabc"]);
    }

    #[test]
    fn eligible_filter_keeps_duplicates() {
        let v = vec![
            ScoreEntry::new("0xSAME", 10.0),
            ScoreEntry::new("0xZERO", 0.0),
            ScoreEntry::new("0xSAME", 20.0),
            ScoreEntry::new("0xNEG", -5.0),
        ];
        let got = eligible_in_canonical_order(&v);
        assert_eq!(addrs(&got), vec!["0xSAME", "0xSAME"]);
        assert_eq!(got[0].score, 20.0);
    }
}
