//! The default `konj` path: run an interactive drill session.

use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use konj_core::cache::ScoreCache;
use konj_core::config::KonjConfig;
use konj_core::console::LineConsole;
use konj_core::engine::{prepare_queue, DrillEngine, EngineConfig, SessionSummary};
use konj_core::model::{Difficulty, Item};
use konj_core::score::{CounterScore, Score, ScoreStrategy, TallyScore};
use konj_core::statistics::filter_by_score_range;
use konj_core::traits::Console;

use super::Selection;
use crate::terminal::TerminalConsole;

pub struct QuizOptions {
    pub selection: Selection,
    /// Question cap; negative means no cap.
    pub number: i64,
    pub difficulty: Option<Difficulty>,
    /// Write the cache back after the session.
    pub save: bool,
}

pub fn execute(files: &[PathBuf], options: QuizOptions, config: &KonjConfig) -> Result<()> {
    let items = konj_core::parser::load_items(files)?;
    match config.scoring {
        ScoreStrategy::Counter => run_session::<CounterScore>(items, &options, config),
        ScoreStrategy::Tally => run_session::<TallyScore>(items, &options, config),
    }
}

fn run_session<S: Score>(
    items: Vec<Item>,
    options: &QuizOptions,
    config: &KonjConfig,
) -> Result<()> {
    let mut cache = ScoreCache::<S>::load(&config.cache_path)?;
    let items = filter_by_score_range(
        &items,
        &cache,
        options.selection.from,
        options.selection.to,
    );

    let mut rng = rand::rng();
    let limit = usize::try_from(options.number).ok();
    let queue = prepare_queue(items, &cache, options.difficulty, limit, &mut rng);

    let engine = DrillEngine::new(EngineConfig::from(config));
    let summary = {
        let mut console = open_console()?;
        engine.run(queue, &mut cache, &mut console, &mut rng)?
    };
    println!("{}", recap(&summary));

    if options.save {
        cache.save(&config.cache_path)?;
    }
    Ok(())
}

fn open_console() -> Result<Box<dyn Console>> {
    let stdin = io::stdin();
    if stdin.is_tty() {
        return Ok(Box::new(TerminalConsole::new()));
    }

    let console = LineConsole::new(BufReader::new(stdin), io::stdout());
    let interrupter = console.interrupter();
    ctrlc::set_handler(move || interrupter.interrupt())
        .context("failed to install Ctrl-C handler")?;
    Ok(Box::new(console))
}

fn recap(summary: &SessionSummary) -> String {
    let mut line = format!(
        "{}/{} right on first try, {} {}.",
        summary.first_try_correct,
        summary.fresh,
        summary.retries,
        if summary.retries == 1 { "retry" } else { "retries" }
    );
    if summary.interrupted {
        line.push_str(&format!(" Stopped with {} left.", summary.unfinished));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recap_for_finished_session() {
        let summary = SessionSummary {
            presented: 6,
            fresh: 5,
            retries: 1,
            first_try_correct: 4,
            ..SessionSummary::default()
        };
        assert_eq!(recap(&summary), "4/5 right on first try, 1 retry.");
    }

    #[test]
    fn recap_mentions_unfinished_items() {
        let summary = SessionSummary {
            presented: 2,
            fresh: 2,
            first_try_correct: 2,
            unfinished: 3,
            interrupted: true,
            ..SessionSummary::default()
        };
        assert_eq!(
            recap(&summary),
            "2/2 right on first try, 0 retries. Stopped with 3 left."
        );
    }
}
