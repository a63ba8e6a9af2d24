//! Canonical month starts
//!
//! A distribution is keyed by the UTC timestamp of 00:00:00 on the first day
//! of its month. Callers supply that timestamp; the calendar decides whether
//! it is the month currently active at `now`.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use lib_types::Timestamp;

use crate::errors::{EconomyError, EconomyResult};

/// 2022-09-01T00:00:00Z
pub const DEFAULT_GENESIS_MONTH_START: Timestamp = 1_661_990_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCalendar {
    /// First month a distribution may be configured for
    genesis_month_start: Timestamp,
}

impl Default for MonthCalendar {
    fn default() -> Self {
        Self {
            genesis_month_start: DEFAULT_GENESIS_MONTH_START,
        }
    }
}

impl MonthCalendar {
    /// # Errors
    /// `InvalidPeriod` if `genesis_month_start` is not itself a month start
    pub fn new(genesis_month_start: Timestamp) -> EconomyResult<Self> {
        let canonical = month_start(genesis_month_start)?;
        if canonical != genesis_month_start {
            return Err(EconomyError::InvalidPeriod {
                month: genesis_month_start,
                expected: canonical,
            });
        }
        Ok(Self { genesis_month_start })
    }

    pub fn genesis_month_start(&self) -> Timestamp {
        self.genesis_month_start
    }

    /// Month start active at `now`
    pub fn active_month(&self, now: Timestamp) -> EconomyResult<Timestamp> {
        month_start(now)
    }

    /// Accept `month` only if it is the start of the month containing `now`
    /// and not earlier than genesis.
    pub fn validate_period(&self, month: Timestamp, now: Timestamp) -> EconomyResult<()> {
        let expected = self.active_month(now)?;
        if month != expected || month < self.genesis_month_start {
            return Err(EconomyError::InvalidPeriod { month, expected });
        }
        Ok(())
    }
}

fn to_datetime(ts: Timestamp) -> EconomyResult<DateTime<Utc>> {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(EconomyError::InvalidTimestamp(ts))
}

fn first_of(year: i32, month: u32, original: Timestamp) -> EconomyResult<Timestamp> {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or(EconomyError::InvalidTimestamp(original))?;
    Timestamp::try_from(start.timestamp()).map_err(|_| EconomyError::InvalidTimestamp(original))
}

/// UTC start of the month containing `ts`
pub fn month_start(ts: Timestamp) -> EconomyResult<Timestamp> {
    let dt = to_datetime(ts)?;
    first_of(dt.year(), dt.month(), ts)
}
