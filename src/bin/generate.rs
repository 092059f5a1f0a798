//! Random-playout log generator.
//!
//! ```text
//! generate run -n 1000000 -o moves.log --seed 7
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use chinese_checkers::playout::{run_many, Playout, PlayoutConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate move logs from uniform random play", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game and log every move.
    Run {
        /// Number of turns to play.
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        turns: u32,

        /// Log file (stdout if omitted).
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// RNG seed (time-based if omitted).
        #[arg(long)]
        seed: Option<u64>,

        /// Stop when a player wins instead of playing on to the turn limit.
        #[arg(long, action = clap::ArgAction::SetTrue)]
        stop_on_win: bool,

        /// Turns between progress lines on stderr (0 disables).
        #[arg(long, default_value_t = 100_000)]
        progress_every: u32,
    },
    /// Play many silent games in parallel and print a JSON summary per game.
    Batch {
        /// Number of games.
        #[arg(short = 'g', long, default_value_t = 16)]
        games: usize,

        /// Turn limit per game.
        #[arg(short = 'n', long, default_value_t = 10_000)]
        turns: u32,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run_logged(config: PlayoutConfig, output: Option<&str>) -> io::Result<()> {
    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let summary = Playout::new(config).run(&mut out)?;
    eprintln!(
        "Played {} moves over {} turns (seed {}): {}",
        summary.moves, summary.turns, summary.seed, summary.end
    );
    Ok(())
}

fn run_batch(config: &PlayoutConfig, games: usize) -> io::Result<()> {
    let summaries = run_many(config, games);
    let mut out = io::stdout().lock();
    for summary in &summaries {
        let line = serde_json::to_string(summary).map_err(io::Error::other)?;
        writeln!(out, "{}", line)?;
    }
    let wins = summaries.iter().filter(|s| s.winner.is_some()).count();
    eprintln!("{} games, {} decided", summaries.len(), wins);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Command::Run {
            turns,
            output,
            seed,
            stop_on_win,
            progress_every,
        } => {
            let config = PlayoutConfig::new()
                .with_max_turns(turns)
                .with_seed(seed.unwrap_or_else(time_seed))
                .with_stop_on_win(stop_on_win)
                .with_progress_every(progress_every);
            run_logged(config, output.as_deref())
        }
        Command::Batch { games, turns, seed } => {
            let config = PlayoutConfig::new()
                .with_max_turns(turns)
                .with_seed(seed.unwrap_or_else(time_seed));
            run_batch(&config, games)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("generate: {}", e);
            ExitCode::FAILURE
        }
    }
}
