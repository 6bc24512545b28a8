//! Core data model types for konj.
//!
//! An [`Item`] is one drillable table cell. Prompts and answers may use
//! alternation syntax (`a/b/c`); [`Item::choose_variant`] resolves that to
//! a single aligned prompt/answer pair each time the item is asked.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Separator between alternative variants inside a prompt or answer.
pub const ALTERNATION: char = '/';

/// A single drillable cell of an input table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Column header, e.g. `"1sg"`. Scores are keyed by this template.
    pub prompt: String,
    /// First cell of the row, e.g. the infinitive `"biti"`.
    pub group: String,
    /// Expected answer template, e.g. `"sem"`.
    pub answer: String,
}

/// One concrete question derived from an [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question<'a> {
    /// The prompt variant to show.
    pub prompt: &'a str,
    /// The answer expected for that prompt variant.
    pub answer: &'a str,
    /// Index of the chosen variant when the prompt uses alternation.
    pub variant: Option<usize>,
}

impl Item {
    pub fn new(
        prompt: impl Into<String>,
        group: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            group: group.into(),
            answer: answer.into(),
        }
    }

    /// Pick the prompt/answer pair to ask this time.
    ///
    /// When both templates use alternation the same index is taken from
    /// each, drawn among the slots whose answer is not blank.
    pub fn choose_variant<R: Rng + ?Sized>(&self, rng: &mut R) -> Question<'_> {
        if !has_alternation(&self.prompt) {
            return Question {
                prompt: &self.prompt,
                answer: &self.answer,
                variant: None,
            };
        }

        let prompts: Vec<&str> = split_variants(&self.prompt).collect();

        if !has_alternation(&self.answer) {
            let index = rng.random_range(0..prompts.len());
            return Question {
                prompt: prompts[index],
                answer: &self.answer,
                variant: Some(index),
            };
        }

        let answers: Vec<&str> = split_variants(&self.answer).collect();
        let slots = prompts.len().min(answers.len());
        let mut eligible: Vec<usize> = (0..slots)
            .filter(|&i| !answers[i].trim().is_empty())
            .collect();
        if eligible.is_empty() {
            eligible = (0..slots).collect();
        }

        let index = eligible[rng.random_range(0..eligible.len())];
        tracing::debug!(group = %self.group, prompt = %self.prompt, index, "chose variant");
        Question {
            prompt: prompts[index],
            answer: answers[index],
            variant: Some(index),
        }
    }
}

/// Whether a template uses alternation syntax.
pub fn has_alternation(template: &str) -> bool {
    template.contains(ALTERNATION)
}

/// Split a template into its `/`-separated variants.
pub fn split_variants(template: &str) -> impl Iterator<Item = &str> {
    template.split(ALTERNATION)
}

/// Number of `/` separators in a template.
pub fn separator_count(template: &str) -> usize {
    template.matches(ALTERNATION).count()
}

/// Case-insensitive comparison of a typed answer against the expected one,
/// ignoring surrounding whitespace.
pub fn answer_matches(input: &str, expected: &str) -> bool {
    input.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Which difficulty band a session should concentrate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Low => write!(f, "low"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::High => write!(f, "high"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Difficulty::Low),
            "medium" => Ok(Difficulty::Medium),
            "high" => Ok(Difficulty::High),
            other => Err(format!(
                "unknown difficulty: {other} (expected low, medium or high)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn plain_prompt_is_asked_verbatim() {
        let item = Item::new("1sg", "biti", "sem");
        let mut rng = StdRng::seed_from_u64(7);
        let q = item.choose_variant(&mut rng);
        assert_eq!(q.prompt, "1sg");
        assert_eq!(q.answer, "sem");
        assert_eq!(q.variant, None);
    }

    #[test]
    fn alternating_prompt_with_plain_answer() {
        let item = Item::new("jaz/ti", "biti", "x");
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let q = item.choose_variant(&mut rng);
            assert!(q.prompt == "jaz" || q.prompt == "ti");
            assert_eq!(q.answer, "x");
        }
    }

    #[test]
    fn variant_indices_stay_aligned() {
        let item = Item::new("on/ona/ono", "biti", "je bil/je bila/je bilo");
        let prompts = ["on", "ona", "ono"];
        let answers = ["je bil", "je bila", "je bilo"];
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let q = item.choose_variant(&mut rng);
            let i = q.variant.unwrap();
            assert_eq!(q.prompt, prompts[i]);
            assert_eq!(q.answer, answers[i]);
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s), "every variant should come up");
    }

    #[test]
    fn blank_answer_slots_are_never_chosen() {
        let item = Item::new("on/ona/ono", "biti", "je bil//je bilo");
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let q = item.choose_variant(&mut rng);
            assert_ne!(q.variant, Some(1));
            assert!(!q.answer.is_empty());
        }
    }

    #[test]
    fn matching_ignores_case_and_surrounding_space() {
        assert!(answer_matches("  Sem ", "sem"));
        assert!(answer_matches("ŠEL", "šel"));
        assert!(!answer_matches("sem", "si"));
        assert!(!answer_matches("", "sem"));
    }

    #[test]
    fn separator_counting() {
        assert_eq!(separator_count("a"), 0);
        assert_eq!(separator_count("a/b"), 1);
        assert_eq!(separator_count("a//c"), 2);
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::High.to_string(), "high");
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("low".parse::<Difficulty>().unwrap(), Difficulty::Low);
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
