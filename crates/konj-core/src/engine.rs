//! Drill session scheduler.
//!
//! Asks every pending item once, keeps missed items in an error queue and
//! replays that queue in shuffled bursts: one burst every
//! `retry_interval` presentations, and a final drain once the pending queue
//! is empty. Only the first attempt at each presentation is recorded in the
//! score cache.

use std::collections::VecDeque;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cache::ScoreCache;
use crate::config::KonjConfig;
use crate::model::{answer_matches, Difficulty, Item};
use crate::score::Score;
use crate::statistics::{compute_buckets, items_in_range, score_histogram};
use crate::traits::Console;

/// Width of the underscore answer field on a question line.
const ANSWER_FIELD_WIDTH: usize = 30;

/// How many times the targeted bucket is repeated in a difficulty session.
const TARGET_REPEATS: usize = 3;

/// Scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Replay the error queue after this many presentations.
    pub retry_interval: usize,
    /// Weight of a correct first attempt.
    pub fresh_points: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_interval: 10,
            fresh_points: 3,
        }
    }
}

impl From<&KonjConfig> for EngineConfig {
    fn from(config: &KonjConfig) -> Self {
        Self {
            retry_interval: config.retry_interval,
            fresh_points: config.fresh_points,
        }
    }
}

/// Weight carried by the retry of a presentation worth `points`.
pub fn retry_weight(points: u32) -> u32 {
    points % 2
}

/// What happened during one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Questions answered (fresh and retries).
    pub presented: usize,
    /// First presentations of pending items.
    pub fresh: usize,
    /// Replays of missed items.
    pub retries: usize,
    /// Fresh presentations answered correctly on the first attempt.
    pub first_try_correct: usize,
    /// Items still owed an answer when the session ended.
    pub unfinished: usize,
    /// The session ended on end of input or a user interrupt.
    pub interrupted: bool,
}

/// Render the question line: remaining count, prompt, answer field and
/// group, with the cursor moved back to the start of the field.
pub fn question_line(remaining: usize, prompt: &str, group: &str) -> String {
    let field = "_".repeat(ANSWER_FIELD_WIDTH);
    let back = "\u{8}".repeat(ANSWER_FIELD_WIDTH + group.chars().count() + 3);
    format!("[{remaining}] {prompt} {field} ({group}){back}")
}

/// Ask one item.
///
/// Returns `Some(true)` only if the first attempt was right. A blank first
/// attempt reveals the answer at once; any other wrong attempt gets one
/// more try before the answer is revealed. `None` means the user ended the
/// session.
pub fn pose_question<C, R>(
    console: &mut C,
    rng: &mut R,
    item: &Item,
    remaining: usize,
) -> Result<Option<bool>>
where
    C: Console + ?Sized,
    R: Rng + ?Sized,
{
    let question = item.choose_variant(rng);
    let line = question_line(remaining, question.prompt, &item.group);

    let Some(answer) = console.read_line(&line)? else {
        return Ok(None);
    };
    if answer.trim().is_empty() {
        reveal(console, question.answer)?;
        return Ok(Some(false));
    }
    if answer_matches(&answer, question.answer) {
        return Ok(Some(true));
    }

    let Some(second) = console.read_line("Try again: ")? else {
        return Ok(None);
    };
    if !answer_matches(&second, question.answer) {
        reveal(console, question.answer)?;
    }
    Ok(Some(false))
}

fn reveal<C: Console + ?Sized>(console: &mut C, answer: &str) -> Result<()> {
    console.print_line(&format!("Correct answer: \"{answer}\""))
}

/// Build the pending queue for a session.
///
/// Without a difficulty the items are shuffled. With one, the items are
/// split into score buckets, each bucket is shuffled, and the targeted
/// bucket is placed first and repeated. `limit` then caps the queue length.
pub fn prepare_queue<S, R>(
    items: Vec<Item>,
    cache: &ScoreCache<S>,
    difficulty: Option<Difficulty>,
    limit: Option<usize>,
    rng: &mut R,
) -> Vec<Item>
where
    S: Score,
    R: Rng + ?Sized,
{
    let mut queue = match difficulty {
        None => {
            let mut items = items;
            items.shuffle(rng);
            items
        }
        Some(difficulty) => {
            let histogram = score_histogram(&items, cache);
            let Some(buckets) = compute_buckets(&histogram) else {
                return Vec::new();
            };
            let mut queue = Vec::new();
            for (position, range) in buckets.session_order(difficulty).into_iter().enumerate() {
                let mut bucket = items_in_range(&items, cache, range);
                bucket.shuffle(rng);
                let repeats = if position == 0 { TARGET_REPEATS } else { 1 };
                for _ in 0..repeats {
                    queue.extend(bucket.iter().cloned());
                }
            }
            queue
        }
    };

    if let Some(limit) = limit {
        queue.truncate(limit);
    }
    queue
}

/// Runs drill sessions against a score cache.
pub struct DrillEngine {
    config: EngineConfig,
}

impl DrillEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Drill `items` in order, recording first attempts into `cache`.
    ///
    /// Ends when every item has been answered correctly once or the user
    /// ends input; either way whatever was recorded stays in `cache`.
    pub fn run<S, C, R>(
        &self,
        items: Vec<Item>,
        cache: &mut ScoreCache<S>,
        console: &mut C,
        rng: &mut R,
    ) -> Result<SessionSummary>
    where
        S: Score,
        C: Console + ?Sized,
        R: Rng + ?Sized,
    {
        let interval = self.config.retry_interval.max(1);
        let mut run = Run {
            fresh_points: self.config.fresh_points,
            cache,
            console,
            rng,
            pending: items.into(),
            errors: VecDeque::new(),
            summary: SessionSummary::default(),
        };

        tracing::info!("starting session with {} items", run.pending.len());

        let mut next_burst = interval;
        while let Some(item) = run.pending.pop_front() {
            let remaining = run.pending.len() + run.errors.len() + 1;
            if !run.ask(item, run.fresh_points, remaining, false)? {
                return run.interrupted();
            }

            if run.summary.presented >= next_burst {
                if !run.burst()? {
                    return run.interrupted();
                }
                next_burst = (run.summary.presented / interval + 1) * interval;
            }
        }

        if !run.drain()? {
            return run.interrupted();
        }

        tracing::info!(
            "session finished: {}/{} right on first try, {} retries",
            run.summary.first_try_correct,
            run.summary.fresh,
            run.summary.retries
        );
        Ok(run.summary)
    }
}

/// A missed item waiting to be asked again.
#[derive(Debug)]
struct Retry {
    item: Item,
    weight: u32,
}

/// Mutable state of one running session.
struct Run<'a, S, C: ?Sized, R: ?Sized> {
    fresh_points: u32,
    cache: &'a mut ScoreCache<S>,
    console: &'a mut C,
    rng: &'a mut R,
    pending: VecDeque<Item>,
    errors: VecDeque<Retry>,
    summary: SessionSummary,
}

impl<S, C, R> Run<'_, S, C, R>
where
    S: Score,
    C: Console + ?Sized,
    R: Rng + ?Sized,
{
    /// Ask one item and book the outcome. Returns `false` if the user ended
    /// the session instead of answering.
    fn ask(&mut self, item: Item, weight: u32, remaining: usize, is_retry: bool) -> Result<bool> {
        let outcome = pose_question(&mut *self.console, &mut *self.rng, &item, remaining)?;
        let Some(correct) = outcome else {
            // The item was never answered; keep it counted as owed.
            if is_retry {
                self.errors.push_front(Retry { item, weight });
            } else {
                self.pending.push_front(item);
            }
            return Ok(false);
        };

        self.cache.record(&item.group, &item.prompt, correct, weight);
        self.summary.presented += 1;
        if is_retry {
            self.summary.retries += 1;
        } else {
            self.summary.fresh += 1;
            if correct {
                self.summary.first_try_correct += 1;
            }
        }

        if !correct {
            tracing::debug!(group = %item.group, prompt = %item.prompt, "requeued missed item");
            self.errors.push_back(Retry {
                item,
                weight: retry_weight(weight),
            });
        }
        Ok(true)
    }

    /// Replay everything currently in the error queue, in random order.
    /// Items missed again wait for the next burst.
    fn burst(&mut self) -> Result<bool> {
        if self.errors.is_empty() {
            return Ok(true);
        }
        let mut burst: Vec<Retry> = self.errors.drain(..).collect();
        burst.shuffle(&mut *self.rng);
        tracing::debug!("replaying {} missed items", burst.len());

        let mut queue: VecDeque<Retry> = burst.into();
        while let Some(retry) = queue.pop_front() {
            let remaining = self.pending.len() + self.errors.len() + queue.len() + 1;
            if !self.ask(retry.item, retry.weight, remaining, true)? {
                // Anything not yet replayed is still owed.
                self.errors.extend(queue);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Replay the error queue until every item has been answered correctly.
    fn drain(&mut self) -> Result<bool> {
        self.errors.make_contiguous().shuffle(&mut *self.rng);
        while let Some(retry) = self.errors.pop_front() {
            let remaining = self.errors.len() + 1;
            if !self.ask(retry.item, retry.weight, remaining, true)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn interrupted(mut self) -> Result<SessionSummary> {
        self.console.print_line("")?;
        self.summary.interrupted = true;
        self.summary.unfinished = self.pending.len() + self.errors.len();
        tracing::info!(
            "session interrupted after {} questions, {} unfinished",
            self.summary.presented,
            self.summary.unfinished
        );
        Ok(self.summary)
    }
}
