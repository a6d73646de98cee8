//! Loader: read local JSON inputs (score list, token holdings, params),
//! check engine preconditions, and return typed values. No network I/O.
//!
//! Input order is kept as given; canonical ordering happens inside the engine.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use lotto_algo::scoring::{points, TokenHolding};
use lotto_core::variables::{validate_domains, Params};
use lotto_core::{CoreError, ScoreEntry};

use crate::{IoError, IoResult};

/// Read cap for any single input file.
pub const MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

/// Token ids that mark an empty collection position.
const PLACEHOLDER_TOKEN_IDS: [&str; 2] = ["", "NO_VALUE"];

// ----------------------------- Wire-facing types -----------------------------

/// One holder of the collection (`holdings.json` → `owners[]`).
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerHoldings {
    pub address: String,
    #[serde(default)]
    pub tokens: Vec<TokenHolding>,
}

#[derive(Debug, Clone, Deserialize)]
struct HoldingsDoc {
    owners: Vec<OwnerHoldings>,
}

// ----------------------------- Targeted loaders -----------------------------

/// `[{"address": "...", "score": n}, ...]`
pub fn load_entrants(path: &Path) -> IoResult<Vec<ScoreEntry>> {
    let v = read_json_value_with_limits(path)?;
    let entrants: Vec<ScoreEntry> = serde_json::from_value(v)?;
    check_entrants(&entrants).map_err(|e| with_path(path, e))?;
    debug!(path = %path.display(), entrants = entrants.len(), "loaded score list");
    Ok(entrants)
}

/// `{"owners": [{"address": "...", "tokens": [TokenHolding, ...]}, ...]}`; each
/// owner's score is the collection points of their non-placeholder tokens.
pub fn load_holdings(path: &Path) -> IoResult<Vec<ScoreEntry>> {
    let v = read_json_value_with_limits(path)?;
    let doc: HoldingsDoc = serde_json::from_value(v)?;
    let entrants: Vec<ScoreEntry> = doc.owners.into_iter().map(score_owner).collect();
    check_entrants(&entrants).map_err(|e| with_path(path, e))?;
    debug!(path = %path.display(), owners = entrants.len(), "loaded token holdings");
    Ok(entrants)
}

/// Params file; missing fields take their defaults.
pub fn load_params(path: &Path) -> IoResult<Params> {
    let v = read_json_value_with_limits(path)?;
    let params: Params = serde_json::from_value(v)?;
    validate_domains(&params).map_err(|e| with_path(path, e))?;
    Ok(params)
}

/// Score one holder. Placeholder tokens are dropped before scoring, so set
/// positions refer to the remaining tokens.
pub fn score_owner(owner: OwnerHoldings) -> ScoreEntry {
    let tokens: Vec<TokenHolding> = owner
        .tokens
        .into_iter()
        .filter(|t| !PLACEHOLDER_TOKEN_IDS.contains(&t.id.as_str()))
        .collect();
    ScoreEntry::new(owner.address, points(&tokens))
}

// ----------------------------- Checks & helpers -----------------------------

fn check_entrants(entrants: &[ScoreEntry]) -> Result<(), CoreError> {
    for e in entrants {
        if e.address.is_empty() {
            return Err(CoreError::EmptyAddress);
        }
        if !e.score.is_finite() {
            return Err(CoreError::NonFiniteScore { address: e.address.to_string() });
        }
    }
    Ok(())
}

fn with_path(path: &Path, e: CoreError) -> IoError {
    IoError::Invalid(format!("{}: {e}", path.display()))
}

fn read_json_value_with_limits(path: &Path) -> IoResult<Value> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    if buf.len() > MAX_INPUT_BYTES {
        return Err(IoError::TooLarge { path: path.display().to_string(), limit: MAX_INPUT_BYTES });
    }
    Ok(serde_json::from_slice(&buf)?)
}
