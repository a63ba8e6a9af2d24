//! Linear hourly vesting

use lib_types::{checked_sub, Amount, ArithmeticResult, Timestamp, SECONDS_PER_HOUR};

/// Hourly ticks in the vesting horizon (31 days)
pub const VESTING_HOURS: u64 = 744;

pub const VESTING_HORIZON_SECS: u64 = VESTING_HOURS * SECONDS_PER_HOUR;

/// Amount claimable now out of a monthly `share`
///
/// Accrual runs at `share / 744` per whole hour since `last_accrual_time`,
/// capped at what is left unclaimed. Once more than the horizon has elapsed
/// since `month`, everything left is claimable, including division dust.
pub fn accrued_amount(
    share: Amount,
    claimed: Amount,
    month: Timestamp,
    last_accrual_time: Timestamp,
    now: Timestamp,
) -> ArithmeticResult<Amount> {
    let remaining = checked_sub(share, claimed)?;
    if remaining == 0 {
        return Ok(0);
    }

    if now.saturating_sub(month) > VESTING_HORIZON_SECS {
        return Ok(remaining);
    }

    let elapsed_hours = now.saturating_sub(last_accrual_time) / SECONDS_PER_HOUR;
    let hourly = share / Amount::from(VESTING_HOURS);
    let vested = hourly.saturating_mul(Amount::from(elapsed_hours));
    Ok(vested.min(remaining))
}
