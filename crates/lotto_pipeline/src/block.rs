//! Which block a round is minted at, and how far along its draw is.

use serde::{Deserialize, Serialize};

/// Mint block: the lucky block once it has been reached, else the current block.
///
/// Before the lucky block the pool is a preview that changes every block;
/// from the lucky block on it is frozen.
#[inline]
pub fn effective_block(current: u64, lucky: u64) -> u64 {
    if current >= lucky {
        lucky
    } else {
        current
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawStatus {
    /// No lucky block set, or it has not been reached.
    Pending,
    /// Lucky block reached; its hash has not been supplied.
    AwaitingHash,
    Drawn,
}

pub fn draw_status(current: u64, lucky: u64, have_hash: bool) -> DrawStatus {
    if lucky == 0 || current < lucky {
        DrawStatus::Pending
    } else if have_hash {
        DrawStatus::Drawn
    } else {
        DrawStatus::AwaitingHash
    }
}
