// crates/lotto_pipeline/src/build_run_record.rs
//
// Typed round artifacts and the run record that pins them.
//
// - tickets.json : pool (wire sentinel -1) + allocation map, with the round's
//                  total, capacity, block and seed.
// - draw.json    : status, winning tickets (wire sentinel -1000), and each
//                  winner's address or the no-winner label.
// - payouts.json : fixed-decimal shares (only once available).
// - run_record   : engine meta, params echo, and SHA-256 of the canonical
//                  entrants and of every artifact above.
//
// Hashes are computed over canonical JSON (lotto_io::hasher), so a run record
// can be checked against artifacts written by any conforming writer.

use serde::{Deserialize, Serialize};

use lotto_algo::{seed_key, PayoutShare};
use lotto_core::{AllocationMap, Params, ScoreEntry, TicketPool, WinningTickets};
use lotto_io::hasher::sha256_canonical;

use crate::{DrawStatus, PipelineError, RoundInputs, RoundOutputs};

/// Engine identifiers recorded in every run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketsDoc {
    pub block: u64,
    pub total_score: f64,
    pub capacity: u32,
    pub seed_key: String,
    pub seed: u32,
    pub tickets: TicketPool,
    pub map: AllocationMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerLine {
    /// Winning index on the wire (`-1000` when underivable).
    pub ticket: i64,
    /// Address, or the configured no-winner label.
    pub winner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawDoc {
    pub status: DrawStatus,
    pub current_block: u64,
    pub lucky_block: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_tickets: Option<WinningTickets>,
    pub winners: Vec<WinnerLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutsDoc {
    pub decimals: u8,
    pub payouts: Vec<PayoutShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputsEcho {
    pub entrants: usize,
    pub entrants_sha256: String,
    pub current_block: u64,
    pub lucky_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutputsEcho {
    pub tickets_sha256: String,
    pub draw_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payouts_sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecordDoc {
    pub engine: EngineMeta,
    pub params: Params,
    pub inputs: RunInputsEcho,
    pub outputs: RunOutputsEcho,
}

/// All artifacts of one round, ready to be written.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub tickets: TicketsDoc,
    pub draw: DrawDoc,
    pub payouts: Option<PayoutsDoc>,
    pub run_record: RunRecordDoc,
}

pub fn build_artifacts(
    inputs: &RoundInputs,
    out: &RoundOutputs,
    engine: EngineMeta,
) -> Result<Artifacts, PipelineError> {
    let tickets = TicketsDoc {
        block: out.block,
        total_score: out.total_score,
        capacity: out.capacity,
        seed_key: seed_key(out.total_score, out.block),
        seed: out.seed,
        tickets: out.outcome.tickets.clone(),
        map: out.outcome.map.clone(),
    };

    let label = inputs.params.no_winner_label.as_str();
    let draw = DrawDoc {
        status: out.status,
        current_block: inputs.current_block,
        lucky_block: inputs.lucky_block,
        block_hash: inputs.block_hash.clone(),
        winning_tickets: out.winning_tickets.clone(),
        winners: out
            .winners
            .iter()
            .map(|w| WinnerLine {
                ticket: w.ticket.map_or(lotto_core::NO_WINNER, i64::from),
                winner: w.display(label).to_string(),
            })
            .collect(),
    };

    let payouts = out
        .payouts
        .as_ref()
        .map(|p| PayoutsDoc { decimals: inputs.params.payout_decimals, payouts: p.clone() });

    let run_record = RunRecordDoc {
        engine,
        params: inputs.params.clone(),
        inputs: RunInputsEcho {
            entrants: out.entrants.len(),
            entrants_sha256: entrants_digest(&out.entrants)?,
            current_block: inputs.current_block,
            lucky_block: inputs.lucky_block,
        },
        outputs: RunOutputsEcho {
            tickets_sha256: sha256_canonical(&tickets)?,
            draw_sha256: sha256_canonical(&draw)?,
            payouts_sha256: payouts.as_ref().map(sha256_canonical).transpose()?,
        },
    };

    Ok(Artifacts { tickets, draw, payouts, run_record })
}

/// Digest of the entrant list in input order.
fn entrants_digest(entrants: &[ScoreEntry]) -> Result<String, PipelineError> {
    Ok(sha256_canonical(&entrants)?)
}
