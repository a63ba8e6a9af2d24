//! Command log replay
//!
//! A command log is JSON Lines: one `{"at": <unix-ts>, "command": {...}}`
//! object per line. Blank lines are skipped. A rejected command is reported
//! and replay continues with the next line.

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::debug;

use lib_types::Timestamp;

use crate::clock::ManualClock;
use crate::command::{CommandOutcome, LedgerCommand};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    /// Falls back to the replay's default time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Timestamp>,
    pub command: LedgerCommand,
}

#[derive(Debug)]
pub struct ReplayLine {
    pub line: usize,
    pub command: &'static str,
    pub result: LedgerResult<CommandOutcome>,
}

#[derive(Debug, Default)]
pub struct ReplayReport {
    pub lines: Vec<ReplayLine>,
}

impl ReplayReport {
    pub fn applied(&self) -> usize {
        self.lines.iter().filter(|l| l.result.is_ok()).count()
    }

    pub fn rejected(&self) -> usize {
        self.lines.len() - self.applied()
    }
}

pub fn parse_entry(line: usize, raw: &str) -> LedgerResult<ReplayEntry> {
    serde_json::from_str(raw).map_err(|e| LedgerError::InvalidCommand {
        line,
        reason: e.to_string(),
    })
}

/// Apply every entry of `reader` to `ledger` in order
///
/// The clock is set to each entry's `at` (or `default_at`) before the
/// command runs. Malformed lines abort the replay; rejected commands do not.
pub fn replay<R: BufRead>(
    ledger: &Ledger,
    clock: &ManualClock,
    reader: R,
    default_at: Timestamp,
) -> LedgerResult<ReplayReport> {
    let mut report = ReplayReport::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let raw = line?;
        if raw.trim().is_empty() {
            continue;
        }

        let entry = parse_entry(line_no, &raw)?;
        let at = entry.at.unwrap_or(default_at);
        clock.set(at);
        debug!(line = line_no, at, command = entry.command.name(), "replaying");

        let command = entry.command.name();
        let result = ledger.execute(entry.command);
        report.lines.push(ReplayLine {
            line: line_no,
            command,
            result,
        });
    }

    Ok(report)
}
