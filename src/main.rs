//! Headless replay runner.
//!
//! `blockfall replay <SCRIPT>` plays a JSON script and prints the transcript
//! as JSON on stdout; logs go to stderr.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::prelude::*;

use blockfall::engine::{run_script, Script};
use blockfall::records::{GameMode, HighscoreBook};

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a script and print its transcript
    Replay {
        /// Path to the JSON script
        script: PathBuf,

        #[arg(long, help = "Submit the result to this highscore file")]
        highscores: Option<PathBuf>,

        #[arg(long, help = "Timestamp for the submitted record (unix ms, default: now)")]
        now: Option<u64>,
    },
    /// Print the best records of one mode
    Highscores {
        /// Path to the highscore file
        path: PathBuf,

        #[arg(long, value_parser = parse_mode, help = "rush, ascent or infinity")]
        mode: GameMode,

        #[arg(long, default_value = "10")]
        top: usize,
    },
}

#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about)]
struct Cli {
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity level (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn parse_mode(s: &str) -> Result<GameMode, String> {
    GameMode::from_str(s).ok_or_else(|| format!("unknown mode: {}", s))
}

fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn unix_ms_now() -> Result<u64> {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the unix epoch")?;
    Ok(since_epoch.as_millis() as u64)
}

fn replay(script_path: PathBuf, highscores: Option<PathBuf>, now: Option<u64>) -> Result<()> {
    let script = Script::load(&script_path)?;
    let transcript = run_script(&script)
        .with_context(|| format!("Failed to replay {}", script_path.display()))?;
    info!(
        mode = %transcript.mode,
        score = transcript.summary.score,
        lines = transcript.summary.lines,
        "replay complete"
    );

    println!("{}", serde_json::to_string_pretty(&transcript)?);

    let Some(path) = highscores else {
        return Ok(());
    };
    let achieved_at = match now {
        Some(ms) => ms,
        None => unix_ms_now()?,
    };
    let Some(record) = transcript.score_record(achieved_at) else {
        info!(mode = %transcript.mode, "session produced no record");
        return Ok(());
    };

    let mut book = HighscoreBook::load(&path)?;
    match book.submit(transcript.mode, record) {
        Some(rank) => {
            book.save(&path)?;
            info!(mode = %transcript.mode, rank, "new highscore");
        }
        None => debug!(mode = %transcript.mode, "record did not place"),
    }
    Ok(())
}

fn highscores(path: PathBuf, mode: GameMode, top: usize) -> Result<()> {
    let book = HighscoreBook::load(&path)?;
    let records = book.top(mode, top);
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level_for(cli.verbose)))
        .init();

    match cli.command {
        Commands::Replay {
            script,
            highscores: book,
            now,
        } => replay(script, book, now),
        Commands::Highscores { path, mode, top } => highscores(path, mode, top),
    }
}
