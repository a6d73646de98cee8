//! Winning ticket extraction from a block hash.
//!
//! `n` (3/4/5 by tier, 3 for any other capacity) is both the digits per
//! winning number and the number of winners. Decimal digits of the hash (see
//! `parse_digits` for the `0x` prefix) are grouped `n` at a time from the
//! right; the rightmost group is the first winner. Fewer than `n` digits gives
//! no winners at all; fewer than `n` groups pads the tail with unresolved
//! entries.

use lotto_core::WinningTickets;

use crate::capacity::Tier;

/// Decimal digit values of every `0`–`9` char in `hash`, in order.
///
/// A hash whose body after a leading `0x`/`0X` has no digit yields nothing,
/// so the prefix alone never produces a winner. Otherwise every digit counts,
/// the prefix `0` included.
pub fn parse_digits(hash: &str) -> Vec<u8> {
    let body = hash
        .strip_prefix("0x")
        .or_else(|| hash.strip_prefix("0X"))
        .unwrap_or(hash);
    if !body.bytes().any(|b| b.is_ascii_digit()) {
        return Vec::new();
    }
    hash.bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Winner count (and digits per winner) for a pool size.
#[inline]
pub fn winner_digits(capacity: u32) -> usize {
    Tier::from_capacity(capacity).map_or(3, Tier::winner_digits)
}

pub fn extract_winners(hash: &str, capacity: u32) -> WinningTickets {
    let n = winner_digits(capacity);
    let digits = parse_digits(hash);
    if digits.len() < n {
        return WinningTickets::unresolved(n);
    }

    let mut out: Vec<Option<u32>> = digits
        .rchunks(n)
        .take(n)
        .map(|group| Some(group.iter().fold(0u32, |acc, &d| acc * 10 + u32::from(d))))
        .collect();
    out.resize(n, None);
    WinningTickets::from_slots(out)
}
