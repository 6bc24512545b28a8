//! Score histograms and difficulty bucketing.
//!
//! Buckets split the observed score range into three contiguous bands of
//! roughly a third of the items each. The lowest-score band is the hardest
//! and is deliberately kept smaller than a third, so that a large pile of
//! never-answered items does not drown out the genuinely difficult ones.

use std::collections::BTreeMap;

use crate::cache::ScoreCache;
use crate::model::{Difficulty, Item};
use crate::score::Score;

/// The first bucket takes scores while more than this many thirds remain.
pub const FIRST_BUCKET_RATIO: f64 = 2.3;

/// The second bucket takes scores while more than this many thirds remain.
pub const SECOND_BUCKET_RATIO: f64 = 1.1;

/// Score value -> number of items holding that score.
pub type Histogram = BTreeMap<i64, usize>;

/// Count items per current score.
pub fn score_histogram<S: Score>(items: &[Item], cache: &ScoreCache<S>) -> Histogram {
    let mut histogram = Histogram::new();
    for item in items {
        *histogram.entry(cache.score_of(item)).or_default() += 1;
    }
    histogram
}

/// An inclusive score range. Empty when `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

impl ScoreRange {
    /// A range holding no score at all.
    pub const EMPTY: ScoreRange = ScoreRange {
        min: i64::MAX,
        max: i64::MIN,
    };

    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, score: i64) -> bool {
        self.min <= score && score <= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Number of items in `histogram` that fall inside this range.
    pub fn count(&self, histogram: &Histogram) -> usize {
        if self.is_empty() {
            return 0;
        }
        histogram.range(self.min..=self.max).map(|(_, n)| n).sum()
    }
}

/// Three contiguous score bands, from lowest score (hardest) to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buckets {
    pub low: ScoreRange,
    pub medium: ScoreRange,
    pub high: ScoreRange,
}

impl Buckets {
    /// The bucket holding items of the given difficulty. Difficulty runs
    /// opposite to score.
    pub fn for_difficulty(&self, difficulty: Difficulty) -> ScoreRange {
        match difficulty {
            Difficulty::High => self.low,
            Difficulty::Medium => self.medium,
            Difficulty::Low => self.high,
        }
    }

    /// Bucket order used to compose a session targeting `difficulty`.
    /// The first entry is the targeted band.
    pub fn session_order(&self, difficulty: Difficulty) -> [ScoreRange; 3] {
        match difficulty {
            Difficulty::Low => [self.high, self.medium, self.low],
            Difficulty::Medium => [self.medium, self.low, self.high],
            Difficulty::High => [self.low, self.medium, self.high],
        }
    }
}

/// Split a score histogram into three difficulty buckets.
///
/// Scores are scanned in ascending order. The first bucket keeps taking
/// scores while the unallocated item count exceeds
/// [`FIRST_BUCKET_RATIO`] thirds of the total, the second while it exceeds
/// [`SECOND_BUCKET_RATIO`] thirds, and the third gets the rest. A bucket that
/// takes no score is [`ScoreRange::EMPTY`]. Returns `None` for an empty
/// histogram.
pub fn compute_buckets(histogram: &Histogram) -> Option<Buckets> {
    let (&lowest, _) = histogram.first_key_value()?;
    let (&highest, _) = histogram.last_key_value()?;

    let total: usize = histogram.values().sum();
    let third = total as f64 / 3.0;
    let mut remaining = total;
    let mut scores = histogram.iter();

    // Returns the last score taken, if any.
    let mut take_while_above = |ratio: f64| -> Option<i64> {
        let mut end = None;
        while remaining as f64 > ratio * third {
            let Some((&score, &count)) = scores.next() else {
                break;
            };
            remaining -= count;
            end = Some(score);
        }
        end
    };

    let low_start = Some(lowest);
    let low_end = take_while_above(FIRST_BUCKET_RATIO);
    let medium_start = next_start(low_start, low_end);
    let medium_end = take_while_above(SECOND_BUCKET_RATIO);
    let high_start = next_start(medium_start, medium_end);

    let buckets = Buckets {
        low: band(low_start, low_end),
        medium: band(medium_start, medium_end),
        high: band(high_start, Some(highest)),
    };
    tracing::debug!(?buckets, total, "computed buckets");
    Some(buckets)
}

/// First score after a bucket. `None` once `i64::MAX` has been taken.
fn next_start(start: Option<i64>, end: Option<i64>) -> Option<i64> {
    match end {
        Some(end) => end.checked_add(1),
        None => start,
    }
}

fn band(start: Option<i64>, end: Option<i64>) -> ScoreRange {
    match (start, end) {
        (Some(min), Some(max)) if min <= max => ScoreRange::new(min, max),
        _ => ScoreRange::EMPTY,
    }
}

/// Keep items whose current score lies within `[min, max]`. A missing bound
/// leaves that side open.
pub fn filter_by_score_range<S: Score>(
    items: &[Item],
    cache: &ScoreCache<S>,
    min: Option<i64>,
    max: Option<i64>,
) -> Vec<Item> {
    items
        .iter()
        .filter(|item| {
            let score = cache.score_of(item);
            min.is_none_or(|lo| score >= lo) && max.is_none_or(|hi| score <= hi)
        })
        .cloned()
        .collect()
}

/// Items inside one bucket.
pub fn items_in_range<S: Score>(
    items: &[Item],
    cache: &ScoreCache<S>,
    range: ScoreRange,
) -> Vec<Item> {
    filter_by_score_range(items, cache, Some(range.min), Some(range.max))
}
