//! Prize shares: each eligible entrant's fraction of the total score.

use lotto_core::determinism::eligible_in_canonical_order;
use lotto_core::{Address, CoreError, CoreResult, ScoreEntry};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoutShare {
    pub address: Address,
    /// `score / total`, unrounded.
    pub share: f64,
    /// `share` rendered with a fixed number of decimals.
    pub amount: String,
}

/// Shares for every entrant with a positive score, in canonical order.
///
/// Fails when no positive score exists (the total would be zero).
pub fn payout_shares(entrants: &[ScoreEntry], decimals: u8) -> CoreResult<Vec<PayoutShare>> {
    let eligible = eligible_in_canonical_order(entrants);
    let total: f64 = eligible.iter().map(|e| e.score).sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(CoreError::NonPositiveTotal(total));
    }

    Ok(eligible
        .into_iter()
        .map(|e| {
            let share = e.score / total;
            PayoutShare { address: e.address, share, amount: fixed_half_up(share, decimals) }
        })
        .collect())
}

/* ------------------------- Fixed-decimal rendering ------------------------ */

/// `x` with `decimals` fractional digits, exact ties rounded up.
///
/// Rounding works on the exact binary value of `x` (`m * 2^e`), so a share
/// such as `1/512` renders as `0.00195313` at eight decimals. Values that do
/// not fit the integer path fall back to the formatter.
pub fn fixed_half_up(x: f64, decimals: u8) -> String {
    let prec = usize::from(decimals);
    match scaled_half_up(x, decimals) {
        Some(n) => {
            let unit = 10u128.pow(u32::from(decimals));
            if prec == 0 {
                n.to_string()
            } else {
                format!("{}.{:0prec$}", n / unit, n % unit)
            }
        }
        None => format!("{x:.prec$}"),
    }
}

/// `round_half_up(x * 10^decimals)` for a finite, non-negative `x`.
fn scaled_half_up(x: f64, decimals: u8) -> Option<u128> {
    if !x.is_finite() || x < 0.0 || decimals > 18 {
        return None;
    }
    let bits = x.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let frac = u128::from(bits & ((1u64 << 52) - 1));
    let (mantissa, exp) = if exp_bits == 0 {
        (frac, -1074)
    } else {
        (frac | (1u128 << 52), exp_bits - 1075)
    };

    // mantissa < 2^53 and 10^18 < 2^60, so the product stays below 2^113.
    let num = mantissa * 10u128.pow(u32::from(decimals));
    if exp >= 0 {
        return num.checked_mul(1u128.checked_shl(exp as u32)?);
    }
    let k = exp.unsigned_abs();
    if k >= 114 {
        // num < 2^113 <= 2^(k-1): below one half.
        return Some(0);
    }
    let q = num >> k;
    let r = num & ((1u128 << k) - 1);
    Some(if r >= 1u128 << (k - 1) { q + 1 } else { q })
}
