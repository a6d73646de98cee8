//! Scores for holders of a graded token collection.
//!
//! A holder's score is `Σ coef[bracket] * grade_points * count` over the
//! collection. `coef` starts at 1 in every bracket and is raised when the
//! holder completes a set:
//!   * bracket 0: tokens 0..=3 → 1.5
//!   * bracket 1: tokens 4..=7 → 1.5
//!   * brackets 2..=6: triples at 8, 11, 14, 17, 20 → 2
//!   * brackets 7..=11: pairs at 23, 25, 27, 29, 31 → 3
//! Token positions refer to the holding list as given (collection order),
//! not to `TokenHolding::index`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const BRACKETS: usize = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    Common,
    Special,
    Rare,
    Unique,
    Legendary,
}

impl Grade {
    pub const ALL: [Grade; 5] =
        [Grade::Common, Grade::Special, Grade::Rare, Grade::Unique, Grade::Legendary];

    pub fn points(self) -> f64 {
        match self {
            Grade::Common => 1.0,
            Grade::Special => 3.0,
            Grade::Rare => 7.0,
            Grade::Unique => 30.0,
            Grade::Legendary => 50.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Common => "Common",
            Grade::Special => "Special",
            Grade::Rare => "Rare",
            Grade::Unique => "Unique",
            Grade::Legendary => "Legendary",
        }
    }

    /// Exact, case-sensitive match on the level label.
    pub fn from_level(level: &str) -> Option<Self> {
        Grade::ALL.into_iter().find(|g| g.as_str() == level)
    }
}

/// One token of the collection as held by one address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub index: u32,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub is_full: bool,
    #[serde(default)]
    pub bracket: i64,
    /// Grade label; labels outside [`Grade`] score as 1 point.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    Grade::Common.as_str().to_string()
}

impl TokenHolding {
    fn grade_points(&self) -> f64 {
        Grade::from_level(&self.level).map_or(1.0, Grade::points)
    }

    fn weighted(&self, coef: &[f64; BRACKETS]) -> f64 {
        let b = self.bracket.clamp(0, BRACKETS as i64 - 1) as usize;
        coef[b] * self.grade_points() * self.count as f64
    }
}

/// Per-bracket set-completion multipliers.
pub fn multiplicators(tokens: &[TokenHolding]) -> [f64; BRACKETS] {
    let held = |i: usize| tokens.get(i).is_some_and(|t| t.count > 0);
    let all_held = |start: usize, len: usize| (start..start + len).all(held);

    let mut coef = [1.0; BRACKETS];
    let mut slot = 0;
    for start in [0, 4] {
        if all_held(start, 4) {
            coef[slot] = 1.5;
        }
        slot += 1;
    }
    for start in (8..=20).step_by(3) {
        if all_held(start, 3) {
            coef[slot] = 2.0;
        }
        slot += 1;
    }
    for start in (23..=31).step_by(2) {
        if all_held(start, 2) {
            coef[slot] = 3.0;
        }
        slot += 1;
    }
    coef
}

/// Total score for one holder.
pub fn points(tokens: &[TokenHolding]) -> f64 {
    let coef = multiplicators(tokens);
    tokens.iter().map(|t| t.weighted(&coef)).sum()
}

/// Score split by grade; every grade is present. Unknown labels are left out.
pub fn points_by_grade(tokens: &[TokenHolding]) -> BTreeMap<Grade, f64> {
    let coef = multiplicators(tokens);
    let mut out: BTreeMap<Grade, f64> = Grade::ALL.into_iter().map(|g| (g, 0.0)).collect();
    for t in tokens {
        if let Some(g) = Grade::from_level(&t.level) {
            *out.entry(g).or_insert(0.0) += t.weighted(&coef);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(index: u32, count: u64, bracket: i64, level: &str) -> TokenHolding {
        TokenHolding {
            index,
            count,
            id: format!("t{index}"),
            is_full: false,
            bracket,
            level: level.to_string(),
        }
    }

    fn collection(held: &[usize], len: usize) -> Vec<TokenHolding> {
        (0..len)
            .map(|i| tok(i as u32, u64::from(held.contains(&i)), 0, "Common"))
            .collect()
    }

    #[test]
    fn no_sets_means_flat_coefficients() {
        assert_eq!(multiplicators(&[]), [1.0; BRACKETS]);
        assert_eq!(multiplicators(&collection(&[0, 1, 2], 33)), [1.0; BRACKETS]);
    }

    #[test]
    fn completed_sets_raise_their_bracket() {
        let held: Vec<usize> = vec![0, 1, 2, 3, 11, 12, 13, 31, 32];
        let coef = multiplicators(&collection(&held, 33));
        assert_eq!(coef[0], 1.5);
        assert_eq!(coef[1], 1.0);
        assert_eq!(coef[3], 2.0);
        assert_eq!(coef[11], 3.0);
        assert_eq!(coef[12..], [1.0; 8]);
    }

    #[test]
    fn last_pair_needs_token_32_to_exist() {
        let coef = multiplicators(&collection(&[31], 32));
        assert_eq!(coef[11], 1.0);
    }

    #[test]
    fn points_weight_grade_count_and_bracket() {
        let tokens = vec![
            tok(0, 1, 0, "Common"),
            tok(1, 1, 0, "Common"),
            tok(2, 1, 0, "Common"),
            tok(3, 2, 0, "Common"),
            tok(4, 1, 5, "Legendary"),
            tok(5, 3, 99, "Mythic"),
        ];
        // 1.5 * (1 + 1 + 1 + 2) + 50 + 3 (bracket clamps to 19, unknown grade = 1)
        assert_eq!(points(&tokens), 7.5 + 50.0 + 3.0);
    }

    #[test]
    fn negative_bracket_clamps_to_zero() {
        let mut tokens = collection(&[0, 1, 2, 3], 4);
        tokens[0].bracket = -4;
        assert_eq!(points(&tokens), 6.0);
    }

    #[test]
    fn by_grade_lists_all_grades() {
        let tokens = vec![tok(0, 2, 0, "Rare"), tok(1, 1, 0, "Other")];
        let by = points_by_grade(&tokens);
        assert_eq!(by.len(), 5);
        assert_eq!(by[&Grade::Rare], 14.0);
        assert_eq!(by[&Grade::Common], 0.0);
        assert_eq!(by.values().sum::<f64>() + 1.0, points(&tokens));
    }

    #[test]
    fn holding_defaults_from_json() {
        let t: TokenHolding = serde_json::from_str(r#"{"index":3,"count":2}"#).unwrap();
        assert_eq!(t.level, "Common");
        assert_eq!(t.bracket, 0);
        assert_eq!(points(&[t]), 2.0);
    }
}
