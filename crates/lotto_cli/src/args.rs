// crates/lotto_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
//
// Rules:
// - Exactly one of --scores XOR --holdings
// - Inputs are local files; URLs are refused
// - --current-block is required unless --validate-only
// - --remainder-policy overrides the params file

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use lotto_core::RemainderPolicy;

/// Command line of `lotto`.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "lotto",
    disable_help_subcommand = true,
    about = "Offline, deterministic weighted-lottery rounds"
)]
pub struct Args {
    // --- Inputs ---
    /// Score list JSON: [{"address": "...", "score": n}, ...]
    #[arg(long, conflicts_with = "holdings")]
    pub scores: Option<PathBuf>,
    /// Token holdings JSON: {"owners": [{"address": "...", "tokens": [...]}]}
    #[arg(long, conflicts_with = "scores")]
    pub holdings: Option<PathBuf>,
    /// Params JSON (all fields optional).
    #[arg(long)]
    pub params: Option<PathBuf>,

    // --- Round ---
    /// Current chain height.
    #[arg(long, required_unless_present = "validate_only")]
    pub current_block: Option<u64>,
    /// Block whose hash draws the winners (0: no draw scheduled).
    #[arg(long, default_value_t = 0)]
    pub lucky_block: u64,
    /// Hash of the lucky block, once it exists.
    #[arg(long)]
    pub hash: Option<String>,
    /// Remainder policy override: legacy | proportional.
    #[arg(long, value_parser = parse_policy)]
    pub remainder_policy: Option<RemainderPolicy>,

    // --- Output & control ---
    /// Directory the artifacts are written to.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Load and check inputs only; write nothing.
    #[arg(long)]
    pub validate_only: bool,
    /// Errors only on stderr.
    #[arg(long)]
    pub quiet: bool,
    /// Log filter when RUST_LOG is unset (e.g. info, lotto_algo=debug).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// The selected entrant source.
    pub fn input(&self) -> Result<Input<'_>, CliError> {
        match (&self.scores, &self.holdings) {
            (Some(p), None) => Ok(Input::Scores(p)),
            (None, Some(p)) => Ok(Input::Holdings(p)),
            _ => Err(CliError::InputChoice),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Scores(&'a Path),
    Holdings(&'a Path),
}

/// Errors surfaced by argument validation. Messages stay short and stable.
#[derive(Debug)]
pub enum CliError {
    InputChoice,
    NonLocalPath(String),
    NotFound(String),
    EmptyHash,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            InputChoice => write!(f, "exactly one of --scores/--holdings is required"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            EmptyHash => write!(f, "--hash must not be empty"),
        }
    }
}
impl std::error::Error for CliError {}

pub fn parse_policy(s: &str) -> Result<RemainderPolicy, String> {
    s.trim()
        .parse::<RemainderPolicy>()
        .map_err(|_| "expected legacy or proportional".to_string())
}

pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Rejects remote paths, checks that inputs exist, then makes every path absolute.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    let named = [
        ("--scores", args.scores.as_deref()),
        ("--holdings", args.holdings.as_deref()),
        ("--params", args.params.as_deref()),
    ];
    for p in named.iter().filter_map(|(_, p)| *p) {
        reject_remote(p)?;
    }
    reject_remote(&args.out)?;

    args.input()?;
    for (label, p) in named {
        if let Some(p) = p {
            require_file(p, label)?;
        }
    }
    if args.hash.as_deref().is_some_and(|h| h.trim().is_empty()) {
        return Err(CliError::EmptyHash);
    }

    for p in [&mut args.scores, &mut args.holdings, &mut args.params].into_iter().flatten() {
        *p = absolute(p);
    }
    args.out = absolute(&args.out);
    Ok(args)
}

/// `true` for anything that looks like a URL rather than a filesystem path.
fn looks_remote(s: &str) -> bool {
    let s = s.trim().to_ascii_lowercase();
    s.contains("://") || ["http:", "https:", "file:"].iter().any(|p| s.starts_with(p))
}

fn reject_remote(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if looks_remote(s) => Err(CliError::NonLocalPath(s.to_string())),
        _ => Ok(()),
    }
}

fn require_file(p: &Path, label: &str) -> Result<(), CliError> {
    if fs::metadata(p).is_ok_and(|m| m.is_file()) {
        Ok(())
    } else {
        Err(CliError::NotFound(format!("{label} {}", p.display())))
    }
}

/// Canonical path when it exists, else joined onto the working directory.
fn absolute(p: &Path) -> PathBuf {
    if let Ok(c) = fs::canonicalize(p) {
        return c;
    }
    if p.is_absolute() {
        return p.to_path_buf();
    }
    env::current_dir().map_or_else(|_| p.to_path_buf(), |cwd| cwd.join(p))
}
