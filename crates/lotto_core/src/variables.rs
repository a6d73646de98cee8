//! variables.rs: Engine parameters with safe defaults.
//!
//! Every field has a default so a params file may be partial (or absent).
//! Domain checks live in `validate_domains`; loaders call it after parsing.

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Define a serde'd enum with explicit wire tokens.
macro_rules! serde_enum {
    ($(#[$meta:meta])* $name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_token(self) -> &'static str {
                match self {
                    $( $name::$variant => $token, )+
                }
            }
        }

        impl core::str::FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $token => Ok($name::$variant), )+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

serde_enum!(
    /// How slots left over after the primary pass are handed out.
    ///
    /// `Legacy` reproduces historical rounds: the first entrant in canonical
    /// order whose proportional share is at least one slot takes the whole
    /// remainder. `Proportional` splits the remainder by score share, with
    /// largest-remainder rounding.
    RemainderPolicy => {
        Legacy       = "legacy",
        Proportional = "proportional"
    }
);

impl Default for RemainderPolicy {
    fn default() -> Self { RemainderPolicy::Legacy }
}

pub const DEFAULT_PAYOUT_DECIMALS: u8 = 8;
pub const MAX_PAYOUT_DECIMALS: u8 = 18;
pub const DEFAULT_NO_WINNER_LABEL: &str = "no winner";

/// Engine parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    pub remainder_policy: RemainderPolicy,
    /// Fixed decimals used when rendering payout shares.
    pub payout_decimals: u8,
    /// Label emitted for a winning slot that resolves to nobody.
    pub no_winner_label: String,
    /// Addresses dropped from the round before minting (exact match).
    pub excluded_addresses: Vec<String>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            remainder_policy: RemainderPolicy::default(),
            payout_decimals: DEFAULT_PAYOUT_DECIMALS,
            no_winner_label: DEFAULT_NO_WINNER_LABEL.to_string(),
            excluded_addresses: Vec::new(),
        }
    }
}

impl Params {
    pub fn is_excluded(&self, address: &str) -> bool {
        self.excluded_addresses.iter().any(|a| a == address)
    }
}

/// Check value domains that serde cannot express.
pub fn validate_domains(p: &Params) -> Result<(), CoreError> {
    if p.payout_decimals > MAX_PAYOUT_DECIMALS {
        return Err(CoreError::DomainOutOfRange("payout_decimals (0..=18)"));
    }
    if p.no_winner_label.trim().is_empty() {
        return Err(CoreError::DomainOutOfRange("no_winner_label (non-empty)"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_params_fill_defaults() {
        let p: Params = serde_json::from_str(r#"{"remainder_policy":"proportional"}"#).unwrap();
        assert_eq!(p.remainder_policy, RemainderPolicy::Proportional);
        assert_eq!(p.payout_decimals, 8);
        assert_eq!(p.no_winner_label, "no winner");
        assert!(validate_domains(&p).is_ok());
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_json::from_str::<Params>(r#"{"remainder":"legacy"}"#).is_err());
    }

    #[test]
    fn policy_tokens_round_trip_through_from_str() {
        assert_eq!("legacy".parse::<RemainderPolicy>().unwrap(), RemainderPolicy::Legacy);
        assert_eq!(RemainderPolicy::Proportional.as_token(), "proportional");
        assert!("fair".parse::<RemainderPolicy>().is_err());
    }

    #[test]
    fn exclusion_is_exact_match() {
        let p: Params = serde_json::from_str(r#"{"excluded_addresses":["0xdead"]}"#).unwrap();
        assert!(p.is_excluded("0xdead"));
        assert!(!p.is_excluded("0xDEAD"));
        assert!(!Params::default().is_excluded("0xdead"));
    }

    #[test]
    fn decimals_domain() {
        let p = Params { payout_decimals: 19, ..Params::default() };
        assert!(validate_domains(&p).is_err());
    }
}
