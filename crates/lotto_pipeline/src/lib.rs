//! lotto_pipeline: one deterministic lottery round
//! (filter → total → select block → mint → draw → resolve → payouts → artifacts).
//!
//! The crate does no file I/O of its own: inputs arrive already loaded
//! (see `lotto_io::loader`) and artifacts are returned as typed docs for the
//! caller to write.

use lotto_algo::{
    capacity, derive_seed, extract_winners, mint_with_policy, payout_shares, PayoutShare,
};
use lotto_core::{CoreError, MintOutcome, Params, ScoreEntry, WinningTickets};
use thiserror::Error;
use tracing::{debug, info};

pub mod block;
pub mod build_run_record;
pub mod resolve;

pub use block::{draw_status, effective_block, DrawStatus};
pub use build_run_record::{
    build_artifacts, Artifacts, DrawDoc, EngineMeta, PayoutsDoc, RunRecordDoc, TicketsDoc,
    WinnerLine,
};
pub use resolve::{resolve_winners, ResolvedWinner};

/// Single error surface for round orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("engine: {0}")]
    Engine(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] lotto_io::IoError),

    #[error("payout: {0}")]
    Payout(String),
}

/// Everything a round needs, already loaded and validated.
#[derive(Debug, Clone)]
pub struct RoundInputs {
    pub entrants: Vec<ScoreEntry>,
    pub params: Params,
    pub current_block: u64,
    /// `0` means no draw is scheduled.
    pub lucky_block: u64,
    /// Hash of the lucky block, once known.
    pub block_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RoundOutputs {
    /// Entrants left after address exclusion, in input order.
    pub entrants: Vec<ScoreEntry>,
    pub total_score: f64,
    pub capacity: u32,
    pub block: u64,
    pub seed: u32,
    pub status: DrawStatus,
    pub outcome: MintOutcome,
    /// Present once drawn.
    pub winning_tickets: Option<WinningTickets>,
    pub winners: Vec<ResolvedWinner>,
    /// Present once the lucky block is reached and some score is positive.
    pub payouts: Option<Vec<PayoutShare>>,
}

/// Sum of finite scores; zero and negative scores count, as the pool size
/// has always been derived from the raw total.
pub fn total_score(entrants: &[ScoreEntry]) -> f64 {
    entrants.iter().map(|e| e.score).filter(|s| s.is_finite()).sum()
}

/// Payout shares, available from the lucky block on.
///
/// `Ok(None)` before the lucky block; an error when nobody has a positive score.
pub fn payouts(
    entrants: &[ScoreEntry],
    current_block: u64,
    lucky_block: u64,
    decimals: u8,
) -> Result<Option<Vec<PayoutShare>>, PipelineError> {
    if current_block < lucky_block {
        return Ok(None);
    }
    payout_shares(entrants, decimals)
        .map(Some)
        .map_err(|e| PipelineError::Payout(e.to_string()))
}

/// Run one round.
pub fn run_round(inputs: &RoundInputs) -> Result<RoundOutputs, PipelineError> {
    let params = &inputs.params;
    let entrants: Vec<ScoreEntry> = inputs
        .entrants
        .iter()
        .filter(|e| !params.is_excluded(e.address.as_str()))
        .cloned()
        .collect();
    let excluded = inputs.entrants.len() - entrants.len();

    let total = total_score(&entrants);
    let cap = capacity(total);
    let block = effective_block(inputs.current_block, inputs.lucky_block);
    let seed = derive_seed(total, block);
    debug!(entrants = entrants.len(), excluded, total, capacity = cap, block, seed, "round inputs");

    let outcome = mint_with_policy(total, block, &entrants, params.remainder_policy)?;

    let status = draw_status(inputs.current_block, inputs.lucky_block, inputs.block_hash.is_some());
    let (winning_tickets, winners) = match (status, inputs.block_hash.as_deref()) {
        (DrawStatus::Drawn, Some(hash)) => {
            let w = extract_winners(hash, cap);
            let resolved = resolve_winners(&outcome, &w);
            (Some(w), resolved)
        }
        _ => (None, Vec::new()),
    };

    let any_positive = entrants.iter().any(ScoreEntry::is_eligible);
    let shares = if any_positive {
        payouts(&entrants, inputs.current_block, inputs.lucky_block, params.payout_decimals)?
    } else {
        None
    };

    info!(
        status = ?status,
        block,
        assigned = outcome.tickets.assigned_count(),
        winners = winners.iter().filter(|w| w.owner.is_some()).count(),
        "round complete"
    );

    Ok(RoundOutputs {
        entrants,
        total_score: total,
        capacity: cap,
        block,
        seed,
        status,
        outcome,
        winning_tickets,
        winners,
        payouts: shares,
    })
}
