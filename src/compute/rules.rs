//! Birth/survival rules for Life-like automata.
//!
//! Rules are written as rulestrings of the form `B<digits>/S<digits>`, where the
//! digits list neighbor counts that birth a dead cell and keep a live cell alive.

use std::fmt;
use std::str::FromStr;

use crate::error::{LifeError, Result};

/// Maximum number of digits accepted in one rule group.
const MAX_GROUP_DIGITS: usize = 10;

/// Parsed birth and survival neighbor-count sets.
///
/// Each set is a bitmask over the counts `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    birth: u16,
    survive: u16,
}

impl Default for RuleSet {
    /// Conway's Game of Life, `B3/S23`.
    fn default() -> Self {
        Self {
            birth: 1 << 3,
            survive: (1 << 2) | (1 << 3),
        }
    }
}

impl RuleSet {
    /// Parse a rulestring like `B3/S23`.
    ///
    /// Digit order and duplicates are irrelevant. Fails with
    /// [`LifeError::MalformedRule`] when the `B` prefix or the single `/S`
    /// separator is missing, or a group is empty, non-numeric or longer than
    /// ten digits.
    pub fn parse(rule: &str) -> Result<Self> {
        if !rule.starts_with('B') {
            return Err(LifeError::MalformedRule(format!(
                "{rule:?} must start with 'B' (e.g. B3/S23)"
            )));
        }
        if !rule.contains("/S") {
            return Err(LifeError::MalformedRule(format!(
                "{rule:?} must contain '/S' (e.g. B3/S23)"
            )));
        }

        let fields: Vec<&str> = rule.split('/').collect();
        if fields.len() != 2 {
            return Err(LifeError::MalformedRule(format!(
                "{rule:?} must contain exactly one '/'"
            )));
        }

        let birth = parse_digits(&fields[0][1..])?;
        let survive = parse_digits(fields[1].strip_prefix('S').unwrap_or(fields[1]))?;

        Ok(Self { birth, survive })
    }

    /// Build a rule directly from neighbor counts. Counts above 9 are ignored.
    pub fn from_counts(birth: &[u8], survive: &[u8]) -> Self {
        let mask = |counts: &[u8]| {
            counts
                .iter()
                .filter(|&&c| c <= 9)
                .fold(0u16, |m, &c| m | (1 << c))
        };
        Self {
            birth: mask(birth),
            survive: mask(survive),
        }
    }

    /// Does a dead cell with `neighbors` live neighbors come alive?
    #[inline]
    pub fn births(&self, neighbors: usize) -> bool {
        neighbors <= 9 && self.birth & (1 << neighbors) != 0
    }

    /// Does a live cell with `neighbors` live neighbors stay alive?
    #[inline]
    pub fn survives(&self, neighbors: usize) -> bool {
        neighbors <= 9 && self.survive & (1 << neighbors) != 0
    }

    /// Next state of a cell given its current state and live neighbor count.
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: usize) -> bool {
        if alive {
            self.survives(neighbors)
        } else {
            self.births(neighbors)
        }
    }

    /// Birth counts in ascending order.
    pub fn birth_counts(&self) -> Vec<u8> {
        mask_counts(self.birth)
    }

    /// Survival counts in ascending order.
    pub fn survive_counts(&self) -> Vec<u8> {
        mask_counts(self.survive)
    }
}

impl FromStr for RuleSet {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleSet {
    /// Canonical rulestring with sorted, de-duplicated digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for c in self.birth_counts() {
            write!(f, "{c}")?;
        }
        write!(f, "/S")?;
        for c in self.survive_counts() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Convert a group of decimal digits into a count bitmask.
fn parse_digits(digits: &str) -> Result<u16> {
    if digits.len() > MAX_GROUP_DIGITS {
        return Err(LifeError::MalformedRule(format!(
            "{digits:?} has more than {MAX_GROUP_DIGITS} digits"
        )));
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LifeError::MalformedRule(format!(
            "{digits:?} must be digits from 0-9"
        )));
    }

    Ok(digits.bytes().fold(0u16, |mask, b| mask | (1 << (b - b'0'))))
}

fn mask_counts(mask: u16) -> Vec<u8> {
    (0u8..=9).filter(|&c| mask & (1 << c) != 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_conway() {
        let rules = RuleSet::parse("B3/S23").unwrap();
        assert_eq!(rules, RuleSet::default());
        assert_eq!(rules.birth_counts(), vec![3]);
        assert_eq!(rules.survive_counts(), vec![2, 3]);
        assert!(rules.births(3));
        assert!(!rules.births(2));
        assert!(rules.survives(2));
        assert!(!rules.survives(4));
    }

    #[test]
    fn test_duplicates_and_order_are_harmless() {
        assert_eq!(
            RuleSet::parse("B33/S23").unwrap(),
            RuleSet::parse("B3/S23").unwrap()
        );
        assert_eq!(
            RuleSet::parse("B63/S32").unwrap(),
            RuleSet::parse("B36/S23").unwrap()
        );
    }

    #[test]
    fn test_zero_is_a_member() {
        let rules = RuleSet::parse("B0/S08").unwrap();
        assert!(rules.births(0));
        assert!(rules.survives(0));
        assert!(rules.survives(8));
    }

    #[test]
    fn test_malformed_rules() {
        for rule in [
            "A3/S23",
            "B3S23",
            "B99999999999/S23",
            "B3/S23/S4",
            "B3/Sx",
            "B/S23",
            "B3/S",
            "B+3/S23",
            "b3/s23",
        ] {
            assert!(
                matches!(RuleSet::parse(rule), Err(LifeError::MalformedRule(_))),
                "{} should be rejected",
                rule
            );
        }
    }

    #[test]
    fn test_ten_digits_accepted() {
        let rules = RuleSet::parse("B0123456789/S3").unwrap();
        assert_eq!(rules.birth_counts(), (0..=9).collect::<Vec<u8>>());
    }

    #[test]
    fn test_display_is_canonical() {
        let rules: RuleSet = "B63/S3322".parse().unwrap();
        assert_eq!(rules.to_string(), "B36/S23");
    }

    proptest! {
        #[test]
        fn prop_sets_are_distinct_digits(
            birth in proptest::collection::vec(0u8..=9, 1..=10),
            survive in proptest::collection::vec(0u8..=9, 1..=10),
        ) {
            let group = |d: &[u8]| d.iter().map(|c| char::from(b'0' + c)).collect::<String>();
            let rule = format!("B{}/S{}", group(&birth), group(&survive));
            let parsed = RuleSet::parse(&rule).unwrap();

            let mut b = birth.clone();
            b.sort_unstable();
            b.dedup();
            let mut s = survive.clone();
            s.sort_unstable();
            s.dedup();

            prop_assert_eq!(parsed.birth_counts(), b);
            prop_assert_eq!(parsed.survive_counts(), s);
            prop_assert_eq!(parsed, RuleSet::from_counts(&birth, &survive));
        }
    }
}
