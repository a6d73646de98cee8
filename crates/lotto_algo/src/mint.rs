//! Ticket minting: fill a capacity-sized pool from the seeded slot sequence.
//!
//! Contract:
//! - Eligible entrants (`score > 0`) are taken in canonical order
//!   (score ↓, address ↑); map keys are their positions in that order.
//! - Primary pass: entrant `i` takes `floor(weight * score_i)` positions from
//!   one shared cursor over the sequence, stopping when it runs dry.
//! - Remainder pass (only while a slot is still unassigned) follows
//!   `RemainderPolicy`:
//!     * Legacy: the first entrant whose `floor(remaining * share)` is positive
//!       drains the cursor.
//!     * Proportional: every entrant takes `floor(remaining * share)`, and the
//!       rounding leftover goes by largest fractional part (ties: canonical order).
//! - The map lists every eligible entrant, including those left with no slot.

use lotto_core::determinism::eligible_in_canonical_order;
use lotto_core::{
    AllocationMap, CoreResult, MintOutcome, RemainderPolicy, ScoreEntry, TicketOwner, TicketPool,
};
use tracing::debug;

use crate::capacity::{capacity, weight};
use crate::sequence::generate_sequence;

/// Read position into a slot sequence, shared by both allocation passes.
#[derive(Debug, Clone)]
pub struct SlotCursor<'a> {
    seq: &'a [u32],
    pos: usize,
}

impl<'a> SlotCursor<'a> {
    pub fn new(seq: &'a [u32]) -> Self {
        Self { seq, pos: 0 }
    }

    /// Positions not yet handed out.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.seq.len() - self.pos
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.seq.len()
    }

    /// Hand `owner` up to `n` positions; returns how many the cursor yielded.
    /// Positions outside the pool are skipped but still consumed.
    fn take_into(&mut self, pool: &mut TicketPool, owner: u32, n: usize) -> usize {
        let mut taken = 0;
        while taken < n {
            match self.next() {
                Some(p) => {
                    pool.assign(p as usize, owner);
                    taken += 1;
                }
                None => break,
            }
        }
        taken
    }

    fn drain_into(&mut self, pool: &mut TicketPool, owner: u32) -> usize {
        let n = self.remaining();
        self.take_into(pool, owner, n)
    }
}

impl Iterator for SlotCursor<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let p = *self.seq.get(self.pos)?;
        self.pos += 1;
        Some(p)
    }
}

/// Mint with the default (legacy) remainder policy.
pub fn mint(sum: f64, block: u64, entrants: &[ScoreEntry]) -> CoreResult<MintOutcome> {
    mint_with_policy(sum, block, entrants, RemainderPolicy::default())
}

/// Build the ticket pool and allocation map for one round.
///
/// Returns an all-unassigned pool and an empty map when nobody is eligible,
/// even if `sum` is zero. Otherwise a non-positive `sum` is an error.
pub fn mint_with_policy(
    sum: f64,
    block: u64,
    entrants: &[ScoreEntry],
    policy: RemainderPolicy,
) -> CoreResult<MintOutcome> {
    let cap = capacity(sum) as usize;
    let eligible = eligible_in_canonical_order(entrants);
    if eligible.is_empty() {
        return Ok(MintOutcome::empty(cap));
    }

    let w = weight(sum)?;
    let seq = generate_sequence(sum, block, cap);
    let mut cursor = SlotCursor::new(&seq);
    let mut tickets = TicketPool::unassigned(cap);
    let mut map = AllocationMap::new();

    // Primary pass.
    for (i, e) in eligible.iter().enumerate() {
        let owner = i as u32;
        map.insert(owner, TicketOwner { address: e.address.clone() });
        if cursor.is_exhausted() {
            continue;
        }
        // `as` saturates, so huge products just mean "everything left".
        let allot = (w * e.score).floor() as usize;
        cursor.take_into(&mut tickets, owner, allot);
    }
    let primary_assigned = tickets.assigned_count();

    if tickets.has_unassigned() {
        let remaining = tickets.unassigned_count();
        let total: f64 = eligible.iter().map(|e| e.score).sum();
        match policy {
            RemainderPolicy::Legacy => {
                legacy_remainder(&eligible, remaining, total, &mut cursor, &mut tickets)
            }
            RemainderPolicy::Proportional => {
                proportional_remainder(&eligible, remaining, total, &mut cursor, &mut tickets)
            }
        }
    }

    debug!(
        capacity = cap,
        entrants = eligible.len(),
        weight = w,
        primary_assigned,
        assigned = tickets.assigned_count(),
        policy = policy.as_token(),
        "mint complete"
    );

    Ok(MintOutcome { tickets, map })
}

/// `floor(remaining * score / total)` and the fractional part left behind.
#[inline]
fn share_of(remaining: usize, score: f64, total: f64) -> (usize, f64) {
    let exact = remaining as f64 * (score / total);
    let whole = exact.floor();
    (whole as usize, exact - whole)
}

fn legacy_remainder(
    eligible: &[ScoreEntry],
    remaining: usize,
    total: f64,
    cursor: &mut SlotCursor<'_>,
    tickets: &mut TicketPool,
) {
    for (i, e) in eligible.iter().enumerate() {
        let (additional, _) = share_of(remaining, e.score, total);
        if additional > 0 {
            cursor.drain_into(tickets, i as u32);
            return;
        }
    }
}

fn proportional_remainder(
    eligible: &[ScoreEntry],
    remaining: usize,
    total: f64,
    cursor: &mut SlotCursor<'_>,
    tickets: &mut TicketPool,
) {
    let mut extra: Vec<usize> = Vec::with_capacity(eligible.len());
    let mut fracs: Vec<(usize, f64)> = Vec::with_capacity(eligible.len());
    for (i, e) in eligible.iter().enumerate() {
        let (whole, frac) = share_of(remaining, e.score, total);
        extra.push(whole);
        fracs.push((i, frac));
    }

    let floors: usize = extra.iter().sum();
    let mut leftover = remaining.saturating_sub(floors);
    if leftover > 0 {
        // Fraction ↓, then canonical position ↑.
        fracs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let mut k = 0;
        while leftover > 0 {
            extra[fracs[k].0] += 1;
            leftover -= 1;
            k = (k + 1) % fracs.len();
        }
    }

    for (i, n) in extra.into_iter().enumerate() {
        if cursor.take_into(tickets, i as u32, n) < n {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(a: &str, s: f64) -> ScoreEntry {
        ScoreEntry::new(a, s)
    }

    #[test]
    fn cursor_yields_in_order_and_counts_down() {
        let seq = [4u32, 2, 9];
        let mut c = SlotCursor::new(&seq);
        assert_eq!(c.remaining(), 3);
        assert_eq!(c.next(), Some(4));
        assert_eq!(c.remaining(), 2);
        assert_eq!(c.by_ref().collect::<Vec<_>>(), vec![2, 9]);
        assert!(c.is_exhausted());
        assert_eq!(c.next(), None);
    }

    #[test]
    fn cursor_skips_out_of_range_positions_but_consumes_them() {
        let seq = [0u32, 7, 1];
        let mut c = SlotCursor::new(&seq);
        let mut pool = TicketPool::unassigned(2);
        assert_eq!(c.take_into(&mut pool, 5, 3), 3);
        assert_eq!(pool.to_wire(), vec![5, 5]);
    }

    #[test]
    fn empty_or_ineligible_gives_sentinel_pool() {
        let out = mint(0.0, 1, &[]).unwrap();
        assert_eq!(out.tickets.len(), 1_000);
        assert!(!out.tickets.slots().iter().any(Option::is_some));
        assert!(out.map.is_empty());

        let out = mint(0.0, 1, &[entry("a", 0.0), entry("b", -4.0)]).unwrap();
        assert_eq!(out.tickets.assigned_count(), 0);
        assert!(out.map.is_empty());
    }

    #[test]
    fn eligible_with_non_positive_sum_is_an_error() {
        assert!(mint(0.0, 1, &[entry("a", 1.0)]).is_err());
    }

    #[test]
    fn single_entrant_takes_every_slot() {
        let out = mint(1.0, 9, &[entry("solo", 1.0)]).unwrap();
        assert_eq!(out.tickets.len(), 1_000);
        assert_eq!(out.tickets.count_for(0), 1_000);
        assert_eq!(out.map.len(), 1);
    }

    #[test]
    fn legacy_remainder_goes_to_first_entrant() {
        // weight 800/300; primary: 533 + 266 = 799, 201 left, all to "a".
        let es = [entry("a", 200.0), entry("b", 100.0)];
        let out = mint(300.0, 12_345, &es).unwrap();
        assert_eq!(out.tickets.unassigned_count(), 0);
        assert_eq!(out.tickets.count_for(0), 533 + 201);
        assert_eq!(out.tickets.count_for(1), 266);
    }

    #[test]
    fn proportional_remainder_splits_by_share() {
        let es = [entry("a", 200.0), entry("b", 100.0)];
        let out = mint_with_policy(300.0, 12_345, &es, RemainderPolicy::Proportional).unwrap();
        assert_eq!(out.tickets.unassigned_count(), 0);
        // 201 left: floors 134 + 67 = 201.
        assert_eq!(out.tickets.count_for(0), 533 + 134);
        assert_eq!(out.tickets.count_for(1), 266 + 67);
    }

    #[test]
    fn policies_agree_on_primary_pass_and_map() {
        let es = [entry("x", 3.0), entry("y", 5.0), entry("z", 1.0)];
        let a = mint_with_policy(9.0, 4, &es, RemainderPolicy::Legacy).unwrap();
        let b = mint_with_policy(9.0, 4, &es, RemainderPolicy::Proportional).unwrap();
        assert_eq!(a.map, b.map);
        assert_eq!(a.map[&0].address.as_str(), "y");
        assert_eq!(a.map[&1].address.as_str(), "x");
        assert_eq!(a.map[&2].address.as_str(), "z");
    }

    #[test]
    fn proportional_leftover_by_largest_fraction() {
        // Three equal entrants, sum 3: weight 266.67, primary 266 each → 202 left.
        // Floors 67 each (201), leftover 1 to the first in canonical order.
        let es = [entry("c", 1.0), entry("a", 1.0), entry("b", 1.0)];
        let out = mint_with_policy(3.0, 1, &es, RemainderPolicy::Proportional).unwrap();
        assert_eq!(out.tickets.unassigned_count(), 0);
        assert_eq!(out.map[&0].address.as_str(), "a");
        assert_eq!(out.tickets.count_for(0), 266 + 68);
        assert_eq!(out.tickets.count_for(1), 266 + 67);
        assert_eq!(out.tickets.count_for(2), 266 + 67);
    }
}
