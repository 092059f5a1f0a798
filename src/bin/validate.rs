//! Move-log validator.
//!
//! ```text
//! validate moves.log
//! generate run -n 1000 | validate -
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

use clap::Parser;

use chinese_checkers::replay::validate_log;

#[derive(Parser, Debug)]
#[command(author, version, about = "Check a move log against the rules", long_about = None)]
struct Args {
    /// Log file, or `-` for stdin.
    log: String,

    /// Print a JSON summary instead of the text report.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    json: bool,
}

fn open(path: &str) -> io::Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let report = match open(&args.log).and_then(validate_log) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("validate: {}: {}", args.log, e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report.summary()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("validate: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report);
    }

    if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
