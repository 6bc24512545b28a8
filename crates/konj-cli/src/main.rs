//! konj CLI: drill word forms from CSV tables.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use konj_core::config::load_config_from;
use konj_core::model::Difficulty;
use konj_core::score::ScoreStrategy;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(
    name = "konj",
    version,
    about = "Flashcard drill for word forms (e.g. verb conjugations) kept in CSV tables"
)]
struct Cli {
    /// Input tables: a header row naming the prompts, then one row per group
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Maximum number of questions (default: 20; negative disables the limit)
    #[arg(short, long, allow_negative_numbers = true)]
    number: Option<i64>,

    /// Do not save scores from this run
    #[arg(short = 'C', long)]
    no_cache: bool,

    /// Only check the input files, do not start a quiz
    #[arg(short, long)]
    verify: bool,

    /// Print the score histogram and exit
    #[arg(short, long)]
    stats: bool,

    /// Print item counts per difficulty bucket and exit
    #[arg(long)]
    buckets: bool,

    /// Lowest score of items to include
    #[arg(short, long, allow_negative_numbers = true)]
    from: Option<i64>,

    /// Highest score of items to include
    #[arg(short, long, allow_negative_numbers = true)]
    to: Option<i64>,

    /// Front-load items of this difficulty: low, medium, high
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Score strategy: counter or tally (overrides the config file)
    #[arg(long)]
    scoring: Option<ScoreStrategy>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("konj=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verify {
        return commands::verify::execute(&cli.files);
    }

    let mut config = load_config_from(cli.config.as_deref())?;
    if let Some(scoring) = cli.scoring {
        config.scoring = scoring;
    }

    let selection = commands::Selection {
        from: cli.from,
        to: cli.to,
    };

    if cli.stats || cli.buckets {
        return commands::stats::execute(&cli.files, selection, cli.stats, cli.buckets, &config);
    }

    commands::quiz::execute(
        &cli.files,
        commands::quiz::QuizOptions {
            selection,
            number: cli.number.unwrap_or(config.default_number),
            difficulty: cli.difficulty,
            save: !cli.no_cache,
        },
        &config,
    )
}
