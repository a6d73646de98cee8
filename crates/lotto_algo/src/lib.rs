// crates/lotto_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure, stateless lottery algorithms.
//!
//! Pipeline order: capacity → weight → sequence → mint; `winners` is
//! independent and is composed against a mint by the caller. `scoring` and
//! `payout` are producers/consumers of the score list around that core.

pub mod capacity;
pub mod mint;
pub mod payout;
pub mod scoring;
pub mod sequence;
pub mod winners;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use capacity::{capacity, weight, Tier, SATURATION_RATIO};
pub use mint::{mint, mint_with_policy, SlotCursor};
pub use payout::{payout_shares, PayoutShare};
pub use scoring::{multiplicators, points, points_by_grade, Grade, TokenHolding};
pub use sequence::{derive_seed, generate_sequence, seed_bytes, seed_key};
pub use winners::{extract_winners, parse_digits, winner_digits};

// Core types callers need alongside the algorithms.
pub use lotto_core::{
    AllocationMap, CoreError, MintOutcome, RemainderPolicy, ScoreEntry, TicketPool,
    WinningTickets,
};
