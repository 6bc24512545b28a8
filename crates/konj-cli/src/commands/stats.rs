//! The `konj --stats` / `konj --buckets` paths.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};
use konj_core::cache::ScoreCache;
use konj_core::config::KonjConfig;
use konj_core::model::{Difficulty, Item};
use konj_core::score::{CounterScore, Score, ScoreStrategy, TallyScore};
use konj_core::statistics::{compute_buckets, filter_by_score_range, score_histogram, Histogram};

use super::Selection;

pub fn execute(
    files: &[PathBuf],
    selection: Selection,
    show_stats: bool,
    show_buckets: bool,
    config: &KonjConfig,
) -> Result<()> {
    let items = konj_core::parser::load_items(files)?;
    let histogram = match config.scoring {
        ScoreStrategy::Counter => histogram_for::<CounterScore>(&items, selection, config)?,
        ScoreStrategy::Tally => histogram_for::<TallyScore>(&items, selection, config)?,
    };

    if show_stats {
        println!("{}", histogram_table(&histogram));
        if show_buckets {
            println!();
        }
    }
    if show_buckets {
        println!("{}", bucket_table(&histogram));
    }
    Ok(())
}

fn histogram_for<S: Score>(
    items: &[Item],
    selection: Selection,
    config: &KonjConfig,
) -> Result<Histogram> {
    let cache = ScoreCache::<S>::load(&config.cache_path)?;
    let items = filter_by_score_range(items, &cache, selection.from, selection.to);
    Ok(score_histogram(&items, &cache))
}

/// `score | items`, one row per observed score, ascending.
pub fn histogram_table(histogram: &Histogram) -> Table {
    let rows = histogram
        .iter()
        .map(|(score, count)| (score.to_string(), *count));
    two_column_table("score", rows)
}

/// `difficulty | items`, hardest first. All zero when there are no items.
pub fn bucket_table(histogram: &Histogram) -> Table {
    let buckets = compute_buckets(histogram);
    let rows = [Difficulty::High, Difficulty::Medium, Difficulty::Low]
        .into_iter()
        .map(|difficulty| {
            let count = buckets
                .map(|b| b.for_difficulty(difficulty).count(histogram))
                .unwrap_or(0);
            (difficulty.to_string(), count)
        });
    two_column_table("difficulty", rows)
}

fn two_column_table(label: &str, rows: impl Iterator<Item = (String, usize)>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(label), Cell::new("items")]);
    for (key, count) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(count)]);
    }
    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}
