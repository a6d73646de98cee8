//! Capacity tiers and the score-to-ticket weight.
//!
//! Contract:
//! - Capacity is a three-step function of the total score:
//!     * total <  1000          → 1 000 slots
//!     * 1000 <= total < 10000  → 10 000 slots
//!     * total >= 10000         → 100 000 slots
//! - Weight targets 80 % of capacity: `1` once the total reaches the target,
//!   otherwise `target / total` (always > 1).
//! - Weight is undefined at a zero total; that is an explicit error here.

use lotto_core::{CoreError, CoreResult};

/// Share of the pool the primary allocation pass aims to fill.
pub const SATURATION_RATIO: f64 = 0.8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Small,
    Medium,
    Large,
}

impl Tier {
    pub fn for_total(sum: f64) -> Self {
        if sum >= 10_000.0 {
            Tier::Large
        } else if sum >= 1_000.0 {
            Tier::Medium
        } else {
            Tier::Small
        }
    }

    /// Inverse of `capacity()`; `None` for any other pool size.
    pub fn from_capacity(capacity: u32) -> Option<Self> {
        match capacity {
            1_000 => Some(Tier::Small),
            10_000 => Some(Tier::Medium),
            100_000 => Some(Tier::Large),
            _ => None,
        }
    }

    pub fn capacity(self) -> u32 {
        match self {
            Tier::Small => 1_000,
            Tier::Medium => 10_000,
            Tier::Large => 100_000,
        }
    }

    /// Digits per winning number, which is also the number of winners.
    pub fn winner_digits(self) -> usize {
        match self {
            Tier::Small => 3,
            Tier::Medium => 4,
            Tier::Large => 5,
        }
    }

    /// `capacity * 0.8` (800, 8000, 80000 exactly).
    pub fn saturation_target(self) -> f64 {
        f64::from(self.capacity()) * SATURATION_RATIO
    }

    /// True once `sum` reaches this tier's target, i.e. weight is exactly 1.
    pub fn saturates(self, sum: f64) -> bool {
        sum >= self.saturation_target()
    }
}

/// Pool size for a total score.
#[inline]
pub fn capacity(sum: f64) -> u32 {
    Tier::for_total(sum).capacity()
}

/// Score-to-ticket multiplier, `>= 1` for every positive total.
pub fn weight(sum: f64) -> CoreResult<f64> {
    if !sum.is_finite() || sum <= 0.0 {
        return Err(CoreError::NonPositiveTotal(sum));
    }
    let tier = Tier::for_total(sum);
    if tier.saturates(sum) {
        Ok(1.0)
    } else {
        Ok(tier.saturation_target() / sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_breakpoints() {
        assert_eq!(capacity(0.0), 1_000);
        assert_eq!(capacity(500.0), 1_000);
        assert_eq!(capacity(999.0), 1_000);
        assert_eq!(capacity(999.999), 1_000);
        assert_eq!(capacity(1_000.0), 10_000);
        assert_eq!(capacity(1_001.0), 10_000);
        assert_eq!(capacity(9_999.0), 10_000);
        assert_eq!(capacity(10_000.0), 100_000);
        assert_eq!(capacity(10_001.0), 100_000);
        assert_eq!(capacity(1.0e9), 100_000);
    }

    #[test]
    fn weight_exactly_one_at_each_target() {
        assert_eq!(weight(800.0).unwrap(), 1.0);
        assert_eq!(weight(801.0).unwrap(), 1.0);
        assert_eq!(weight(8_000.0).unwrap(), 1.0);
        assert_eq!(weight(80_000.0).unwrap(), 1.0);
        assert_eq!(weight(80_001.0).unwrap(), 1.0);
    }

    #[test]
    fn weight_below_target_is_ratio() {
        assert_eq!(weight(799.0).unwrap(), 800.0 / 799.0);
        assert_eq!(weight(7_999.0).unwrap(), 8_000.0 / 7_999.0);
        assert_eq!(weight(79_999.0).unwrap(), 80_000.0 / 79_999.0);
        assert_eq!(weight(1_000.0).unwrap(), 8.0);
        assert_eq!(weight(10_000.0).unwrap(), 8.0);
        assert!((weight(350.0).unwrap() - 2.2857).abs() < 1e-4);
        assert!((weight(35_000.0).unwrap() - 2.2857).abs() < 1e-4);
    }

    #[test]
    fn weight_rejects_zero_negative_and_nan() {
        assert_eq!(weight(0.0), Err(CoreError::NonPositiveTotal(0.0)));
        assert!(weight(-1.0).is_err());
        assert!(weight(f64::NAN).is_err());
        assert!(weight(f64::INFINITY).is_err());
    }

    #[test]
    fn tier_round_trips_capacity() {
        for t in [Tier::Small, Tier::Medium, Tier::Large] {
            assert_eq!(Tier::from_capacity(t.capacity()), Some(t));
        }
        assert_eq!(Tier::from_capacity(500), None);
    }
}
