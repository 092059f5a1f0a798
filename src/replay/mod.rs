//! Move logs: text format, replay, validation.
//!
//! - `log`: the `PLAYER <id> MOVE: ...` line format
//! - `replayer`: rebuilding positions (and from/to cells) from a log
//! - `validate`: full-log checking with per-piece movement counts

pub mod log;
pub mod replayer;
pub mod validate;

pub use log::{LogMove, LogParseError};
pub use replayer::{DiagnosticReason, Replay, ReplayDiagnostic, ReplayStep, Replayer};
pub use validate::{validate_log, ReportSummary, ValidationReport};
