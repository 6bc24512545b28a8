//! Mastery score strategies.
//!
//! A [`Score`] is an opaque per-(group, prompt) accumulator. The scheduler
//! only ever calls [`Score::record`]; bucketing only ever reads
//! [`Score::value`]. Which concrete strategy is active is chosen at run time
//! through [`ScoreStrategy`].

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A mastery accumulator stored in the score cache.
///
/// `Default` must produce the zero score returned for unseen items.
pub trait Score: Default + Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// Record one answer. `weight` is what a correct answer is worth.
    fn record(&mut self, correct: bool, weight: u32);

    /// Ordering key used for statistics and bucketing. Higher means better
    /// mastered.
    fn value(&self) -> i64;
}

/// Streak counter: correct answers add their weight, a wrong answer resets
/// the score to zero.
///
/// Serialized as a bare integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterScore(pub u64);

impl Score for CounterScore {
    fn record(&mut self, correct: bool, weight: u32) {
        if correct {
            self.0 = self.0.saturating_add(u64::from(weight));
        } else {
            self.0 = 0;
        }
    }

    fn value(&self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

/// Right/wrong tally. Weights are ignored; every answer counts once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyScore {
    #[serde(default)]
    pub right: u32,
    #[serde(default)]
    pub wrong: u32,
}

impl Score for TallyScore {
    fn record(&mut self, correct: bool, _weight: u32) {
        if correct {
            self.right = self.right.saturating_add(1);
        } else {
            self.wrong = self.wrong.saturating_add(1);
        }
    }

    fn value(&self) -> i64 {
        i64::from(self.right) - i64::from(self.wrong)
    }
}

/// Which [`Score`] implementation a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStrategy {
    /// [`CounterScore`].
    #[default]
    Counter,
    /// [`TallyScore`].
    Tally,
}

impl fmt::Display for ScoreStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreStrategy::Counter => write!(f, "counter"),
            ScoreStrategy::Tally => write!(f, "tally"),
        }
    }
}

impl FromStr for ScoreStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "counter" | "streak" => Ok(ScoreStrategy::Counter),
            "tally" => Ok(ScoreStrategy::Tally),
            other => Err(format!(
                "unknown scoring strategy: {other} (expected counter or tally)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_adds_weight_and_resets() {
        let mut score = CounterScore::default();
        assert_eq!(score.value(), 0);
        score.record(true, 3);
        score.record(true, 1);
        assert_eq!(score.value(), 4);
        score.record(false, 3);
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn tally_counts_each_answer_once() {
        let mut score = TallyScore::default();
        score.record(true, 3);
        score.record(true, 1);
        score.record(false, 3);
        assert_eq!(score, TallyScore { right: 2, wrong: 1 });
        assert_eq!(score.value(), 1);
    }

    #[test]
    fn tally_value_can_go_negative() {
        let mut score = TallyScore::default();
        score.record(false, 3);
        score.record(false, 1);
        assert_eq!(score.value(), -2);
    }

    #[test]
    fn counter_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&CounterScore(6)).unwrap(), "6");
        let parsed: CounterScore = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, CounterScore(4));
    }

    #[test]
    fn tally_serializes_as_object() {
        let json = serde_json::to_string(&TallyScore { right: 3, wrong: 1 }).unwrap();
        assert_eq!(json, r#"{"right":3,"wrong":1}"#);
        let parsed: TallyScore = serde_json::from_str(r#"{"wrong":2}"#).unwrap();
        assert_eq!(parsed, TallyScore { right: 0, wrong: 2 });
    }

    #[test]
    fn strategy_display_and_parse() {
        assert_eq!(ScoreStrategy::Tally.to_string(), "tally");
        assert_eq!("Counter".parse::<ScoreStrategy>().unwrap(), ScoreStrategy::Counter);
        assert_eq!("streak".parse::<ScoreStrategy>().unwrap(), ScoreStrategy::Counter);
        assert!("elo".parse::<ScoreStrategy>().is_err());
        assert_eq!(ScoreStrategy::default(), ScoreStrategy::Counter);
    }
}
