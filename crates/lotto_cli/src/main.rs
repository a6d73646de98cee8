//! lotto: offline runner for one deterministic lottery round.
//!
//! Loads entrants (score list or token holdings) and params, runs the round,
//! and writes canonical JSON artifacts to `--out`:
//! `tickets.json`, `draw.json`, `payouts.json` (once available), `run_record.json`.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const ENGINE: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args, Input};
use lotto_core::{Params, ScoreEntry};
use lotto_io::{canonical_json::write_canonical, loader, IoError};
use lotto_pipeline::{build_artifacts, run_round, EngineMeta, PipelineError, RoundInputs};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum MainError {
    /// Malformed or out-of-domain input.
    Validation(String),
    /// Filesystem trouble (missing, unreadable, unwritable, too large).
    Io(String),
    /// Engine precondition violated during the round.
    Engine(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Engine(m) => write!(f, "engine: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("lotto: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(&args);

    let res = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match res {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("lotto: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr subscriber; `RUST_LOG` wins over `--log-level`, `--quiet` wins over both.
fn init_tracing(args: &Args) {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&args.log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Engine(_) => ENGINE,
    }
}

/// Translate lotto_io::IoError into MainError buckets for exit-code mapping.
fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { .. } | IoError::Invalid(_) => MainError::Validation(e.to_string()),
        IoError::Path(_) | IoError::TooLarge { .. } => MainError::Io(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Engine(_) | PipelineError::Payout(_) => MainError::Engine(e.to_string()),
    }
}

/* ----------------------------- loading ----------------------------- */

fn load_inputs(args: &Args) -> Result<(Vec<ScoreEntry>, Params), MainError> {
    let entrants = match args.input().map_err(|e| MainError::Validation(e.to_string()))? {
        Input::Scores(p) => loader::load_entrants(p),
        Input::Holdings(p) => loader::load_holdings(p),
    }
    .map_err(map_io_err)?;

    let mut params = match &args.params {
        Some(p) => loader::load_params(p).map_err(map_io_err)?,
        None => Params::default(),
    };
    if let Some(policy) = args.remainder_policy {
        params.remainder_policy = policy;
    }
    Ok((entrants, params))
}

/// Load and check inputs only; writes nothing.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let (entrants, params) = load_inputs(args)?;
    info!(
        entrants = entrants.len(),
        policy = params.remainder_policy.as_token(),
        "inputs valid"
    );
    Ok(())
}

/* ------------------------------ run ------------------------------ */

fn engine_meta() -> EngineMeta {
    EngineMeta {
        vendor: option_env!("LOTTO_ENGINE_VENDOR").unwrap_or("lotto").to_string(),
        name: option_env!("LOTTO_ENGINE_NAME")
            .unwrap_or(env!("CARGO_PKG_NAME"))
            .to_string(),
        version: option_env!("LOTTO_ENGINE_VERSION")
            .unwrap_or(env!("CARGO_PKG_VERSION"))
            .to_string(),
        build: option_env!("LOTTO_ENGINE_BUILD").unwrap_or("dev").to_string(),
    }
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let (entrants, params) = load_inputs(args)?;
    let current_block = args
        .current_block
        .ok_or_else(|| MainError::Validation("--current-block is required".into()))?;

    let inputs = RoundInputs {
        entrants,
        params,
        current_block,
        lucky_block: args.lucky_block,
        block_hash: args.hash.as_ref().map(|h| h.trim().to_string()),
    };

    let out = run_round(&inputs).map_err(map_pipeline_err)?;
    let artifacts = build_artifacts(&inputs, &out, engine_meta()).map_err(map_pipeline_err)?;

    write_artifacts(&args.out, &artifacts)
}

fn write_artifacts(out_dir: &Path, a: &lotto_pipeline::Artifacts) -> Result<(), MainError> {
    fs::create_dir_all(out_dir).map_err(|e| MainError::Io(format!("{}: {e}", out_dir.display())))?;

    write_canonical(&out_dir.join("tickets.json"), &a.tickets).map_err(map_io_err)?;
    write_canonical(&out_dir.join("draw.json"), &a.draw).map_err(map_io_err)?;
    if let Some(p) = &a.payouts {
        write_canonical(&out_dir.join("payouts.json"), p).map_err(map_io_err)?;
    }
    write_canonical(&out_dir.join("run_record.json"), &a.run_record).map_err(map_io_err)?;

    debug!(dir = %out_dir.display(), payouts = a.payouts.is_some(), "artifacts written");
    Ok(())
}
