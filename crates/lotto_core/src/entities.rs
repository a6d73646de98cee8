//! Entrant and output types.
//!
//! Internally an unassigned slot or an unresolved winner is `None`. The wire
//! form (serde) keeps the historical integer sentinels so existing consumers
//! keep working: `-1` for an unassigned ticket, `-1000` for a winner that
//! could not be derived from the hash.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as DeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// Wire sentinel for a ticket slot with no owner.
pub const UNASSIGNED: i64 = -1;

/// Wire sentinel for a winning ticket that could not be derived.
pub const NO_WINNER: i64 = -1000;

/* -------------------------------------------------------------------------- */
/*                                   Entrants                                 */
/* -------------------------------------------------------------------------- */

/// Opaque, case-sensitive participant address.
///
/// No uniqueness is enforced anywhere: `0xabc` and `0xABC` are different
/// entrants, and the same address may appear several times.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(s: impl Into<String>) -> Self { Self(s.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for Address {
    fn from(s: String) -> Self { Self(s) }
}

/// One `{address, score}` record. Only entrants with `score > 0` take part in
/// a mint; the rest are accepted and ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub address: Address,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(address: impl Into<Address>, score: f64) -> Self {
        Self { address: address.into(), score }
    }

    /// `false` for zero, negative, and NaN scores.
    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.score > 0.0
    }
}

/* -------------------------------------------------------------------------- */
/*                                  Ticket pool                               */
/* -------------------------------------------------------------------------- */

/// Fixed-length pool of ticket slots; each slot holds an allocation index or nothing.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TicketPool {
    slots: Vec<Option<u32>>,
}

impl TicketPool {
    /// A pool of `capacity` unassigned slots.
    pub fn unassigned(capacity: usize) -> Self {
        Self { slots: vec![None; capacity] }
    }

    pub fn from_slots(slots: Vec<Option<u32>>) -> Self { Self { slots } }

    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    pub fn slots(&self) -> &[Option<u32>] { &self.slots }

    /// Owner of slot `idx`; `None` when unassigned or out of range.
    #[inline]
    pub fn owner_of(&self, idx: usize) -> Option<u32> {
        self.slots.get(idx).copied().flatten()
    }

    /// Write `owner` at `pos`. Out-of-range positions are ignored and reported as `false`.
    #[inline]
    pub fn assign(&mut self, pos: usize, owner: u32) -> bool {
        match self.slots.get_mut(pos) {
            Some(slot) => {
                *slot = Some(owner);
                true
            }
            None => false,
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.len() - self.assigned_count()
    }

    pub fn has_unassigned(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    /// Number of slots held by allocation index `owner`.
    pub fn count_for(&self, owner: u32) -> usize {
        self.slots.iter().filter(|s| **s == Some(owner)).count()
    }

    /// Per-owner slot counts, keyed by allocation index.
    pub fn counts(&self) -> BTreeMap<u32, usize> {
        let mut out = BTreeMap::new();
        for owner in self.slots.iter().flatten() {
            *out.entry(*owner).or_insert(0) += 1;
        }
        out
    }

    /// Wire form with `-1` for unassigned slots.
    pub fn to_wire(&self) -> Vec<i64> {
        self.slots
            .iter()
            .map(|s| s.map_or(UNASSIGNED, i64::from))
            .collect()
    }

    pub fn from_wire(wire: &[i64]) -> Result<Self, CoreError> {
        let slots = wire
            .iter()
            .map(|&v| match v {
                UNASSIGNED => Ok(None),
                v if (0..=i64::from(u32::MAX)).contains(&v) => Ok(Some(v as u32)),
                v => Err(CoreError::InvalidWireValue { kind: "ticket slot", value: v }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }
}

impl Serialize for TicketPool {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(self.slots.len()))?;
        for slot in &self.slots {
            seq.serialize_element(&slot.map_or(UNASSIGNED, i64::from))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for TicketPool {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let wire = Vec::<i64>::deserialize(d)?;
        TicketPool::from_wire(&wire).map_err(D::Error::custom)
    }
}

/// Map value: the entrant that owns an allocation index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketOwner {
    pub address: Address,
}

/// Allocation index (`0..k-1`, no gaps) → owner.
pub type AllocationMap = BTreeMap<u32, TicketOwner>;

/// Result of a mint: the pool plus the map that names its owners.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct MintOutcome {
    pub tickets: TicketPool,
    pub map: AllocationMap,
}

impl MintOutcome {
    pub fn empty(capacity: usize) -> Self {
        Self { tickets: TicketPool::unassigned(capacity), map: AllocationMap::new() }
    }

    /// Owner address of ticket `idx`, if the slot exists, is assigned, and its
    /// index is in the map.
    pub fn resolve(&self, idx: usize) -> Option<&Address> {
        let owner = self.tickets.owner_of(idx)?;
        self.map.get(&owner).map(|o| &o.address)
    }
}

/* -------------------------------------------------------------------------- */
/*                                Winning tickets                             */
/* -------------------------------------------------------------------------- */

/// Fixed-length list of winning slot indices; `None` means "no determinable winner".
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct WinningTickets(Vec<Option<u32>>);

impl WinningTickets {
    /// `n` entries, all unresolved.
    pub fn unresolved(n: usize) -> Self { Self(vec![None; n]) }

    pub fn from_slots(slots: Vec<Option<u32>>) -> Self { Self(slots) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn as_slice(&self) -> &[Option<u32>] { &self.0 }

    pub fn iter(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        self.0.iter().copied()
    }

    pub fn is_all_unresolved(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Wire form with `-1000` for unresolved entries.
    pub fn to_wire(&self) -> Vec<i64> {
        self.0.iter().map(|w| w.map_or(NO_WINNER, i64::from)).collect()
    }
}

impl Serialize for WinningTickets {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(s)
    }
}

impl<'de> Deserialize<'de> for WinningTickets {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let wire = Vec::<i64>::deserialize(d)?;
        wire.into_iter()
            .map(|v| match v {
                NO_WINNER => Ok(None),
                v if (0..=i64::from(u32::MAX)).contains(&v) => Ok(Some(v as u32)),
                v => Err(D::Error::custom(CoreError::InvalidWireValue {
                    kind: "winning ticket",
                    value: v,
                })),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(WinningTickets)
    }
}

/* ---------------------------------- Tests --------------------------------- */
