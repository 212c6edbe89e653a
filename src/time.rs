use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use julian_day_converter::JulianDay;

use crate::constants::SECONDS_PER_DAY;
use crate::errors::EphemError;

/// Sampling cadence unit accepted by Horizons `STEP_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    Days,
    Minutes,
}

/// Sampling cadence of a fetch, e.g. `5 d` or `30 m`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    count: u32,
    unit: StepUnit,
}

impl Step {
    /// A cadence of `count` days
    pub fn days(count: u32) -> Self {
        Step {
            count,
            unit: StepUnit::Days,
        }
    }

    /// A cadence of `count` minutes
    pub fn minutes(count: u32) -> Self {
        Step {
            count,
            unit: StepUnit::Minutes,
        }
    }

    /// Length of one sampling interval expressed in Julian days
    pub fn span_days(&self) -> f64 {
        match self.unit {
            StepUnit::Days => self.count as f64,
            StepUnit::Minutes => self.count as f64 * 60.0 / SECONDS_PER_DAY,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            StepUnit::Days => 'd',
            StepUnit::Minutes => 'm',
        };
        write!(f, "{} {}", self.count, unit)
    }
}

impl FromStr for Step {
    type Err = EphemError;

    /// Parse a cadence like `"5 d"` or `"30 m"` (unit letter case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || EphemError::InvalidStepSize(s.to_string());

        let Some((unit_at, unit)) = trimmed.char_indices().last() else {
            return Err(invalid());
        };
        let count: u32 = trimmed[..unit_at].trim().parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }
        match unit {
            'd' | 'D' => Ok(Step::days(count)),
            'm' | 'M' => Ok(Step::minutes(count)),
            _ => Err(invalid()),
        }
    }
}

/// Convert a calendar instant (UTC) into a Julian day number
pub fn calendar_to_jd(instant: NaiveDateTime) -> f64 {
    instant.to_jd()
}

/// Julian day of a calendar date at a given time of day (UTC)
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: the calendar date
/// * `hour`, `minute`, `second`: the time of day
///
/// Return
/// ------
/// * The Julian day number, or `None` when the components do not name a real instant
pub fn jd_from_calendar(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<f64> {
    let instant = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    Some(calendar_to_jd(instant))
}

/// Julian day of today at 00:00 UTC, the stable stop boundary of a daily run
pub fn today_00z_jd() -> f64 {
    let midnight = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time of day");
    calendar_to_jd(midnight)
}
