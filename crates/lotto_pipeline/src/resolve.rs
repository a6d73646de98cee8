//! Winner resolution: winning index → pool slot → map → address.

use lotto_core::{Address, MintOutcome, WinningTickets};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWinner {
    /// Winning index; `None` when the hash had too few digits.
    pub ticket: Option<u32>,
    /// `None` for an unresolved index, an index past the pool, or an unassigned slot.
    pub owner: Option<Address>,
}

impl ResolvedWinner {
    /// Owner address, or `label` when nobody holds the ticket.
    pub fn display<'a>(&'a self, label: &'a str) -> &'a str {
        self.owner.as_ref().map_or(label, Address::as_str)
    }
}

pub fn resolve_winners(outcome: &MintOutcome, winners: &WinningTickets) -> Vec<ResolvedWinner> {
    winners
        .iter()
        .map(|ticket| {
            let owner = ticket.and_then(|t| outcome.resolve(t as usize)).cloned();
            if owner.is_none() {
                warn!(ticket = ?ticket, pool = outcome.tickets.len(), "winning ticket has no owner");
            }
            ResolvedWinner { ticket, owner }
        })
        .collect()
}
