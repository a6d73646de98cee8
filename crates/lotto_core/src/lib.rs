//! lotto_core: Core types, sentinels, ordering helpers, params, and the seeded slot RNG.
//!
//! This crate is **I/O-free**. It defines the stable types shared across the
//! engine (`lotto_algo`, `lotto_io`, `lotto_pipeline`, `lotto_cli`).
//!
//! - Entrants: `Address`, `ScoreEntry`
//! - Outputs: `TicketPool` (`-1` sentinel), `AllocationMap`, `WinningTickets` (`-1000` sentinel)
//! - Canonical entrant ordering (score ↓, address ↑)
//! - Engine parameters (`Params`, `RemainderPolicy`)
//! - Seedable Mulberry32 stream for slot shuffling

#![forbid(unsafe_code)]

pub mod determinism;
pub mod entities;
pub mod errors;
pub mod rng;
pub mod variables;

pub use entities::{
    Address, AllocationMap, MintOutcome, ScoreEntry, TicketOwner, TicketPool, WinningTickets,
    NO_WINNER, UNASSIGNED,
};
pub use errors::{CoreError, CoreResult};
pub use rng::Mulberry32;
pub use variables::{Params, RemainderPolicy};
