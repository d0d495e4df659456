//! Projection settings and their validation.
//!
//! ```ini
//! [projection]
//! start_date = 2021-01-01
//! duration_days = 365
//! starting_balance = 1500.0
//!
//! [limits]
//! horizon_days = 36525
//! ```

use crate::domain::document::{DEFAULT_LIMIT_HORIZON_DAYS, DecodeOptions};
use crate::domain::error::CashflowError;
use crate::ports::config_port::ConfigPort;
use chrono::{Days, NaiveDate};

pub const DEFAULT_DURATION_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSettings {
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub starting_balance: f64,
    pub limit_horizon_days: u32,
}

/// Values given on the command line; each one replaces the config value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub start_date: Option<NaiveDate>,
    pub duration_days: Option<u32>,
    pub starting_balance: Option<f64>,
}

impl ProjectionSettings {
    pub fn from_config(
        config: &dyn ConfigPort,
        overrides: &SettingsOverrides,
    ) -> Result<Self, CashflowError> {
        let start_date = match overrides.start_date {
            Some(d) => d,
            None => start_date(config)?,
        };

        let duration_days = match overrides.duration_days {
            Some(d) => i64::from(d),
            None => config.get_int("projection", "duration_days", DEFAULT_DURATION_DAYS),
        };
        let duration_days = positive_days("projection", "duration_days", duration_days)?;
        if window_end(start_date, duration_days).is_none() {
            return Err(CashflowError::ConfigInvalid {
                section: "projection".to_string(),
                key: "duration_days".to_string(),
                reason: format!("{duration_days} days from {start_date} is past the last supported date"),
            });
        }

        let starting_balance = overrides
            .starting_balance
            .unwrap_or_else(|| config.get_double("projection", "starting_balance", 0.0));
        if !starting_balance.is_finite() {
            return Err(CashflowError::ConfigInvalid {
                section: "projection".to_string(),
                key: "starting_balance".to_string(),
                reason: "starting_balance must be a finite number".to_string(),
            });
        }

        let limit_horizon_days = decode_options_from_config(config)?.limit_horizon_days;

        Ok(Self {
            start_date,
            duration_days,
            starting_balance,
            limit_horizon_days,
        })
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            limit_horizon_days: self.limit_horizon_days,
        }
    }

    /// First date after the projected window, `None` past the calendar's end.
    pub fn end_date(&self) -> Option<NaiveDate> {
        window_end(self.start_date, self.duration_days)
    }
}

/// Decode options only; used where no start date is needed.
pub fn decode_options_from_config(config: &dyn ConfigPort) -> Result<DecodeOptions, CashflowError> {
    let horizon = config.get_int("limits", "horizon_days", i64::from(DEFAULT_LIMIT_HORIZON_DAYS));
    Ok(DecodeOptions {
        limit_horizon_days: positive_days("limits", "horizon_days", horizon)?,
    })
}

fn start_date(config: &dyn ConfigPort) -> Result<NaiveDate, CashflowError> {
    if let Some(date) = config.get_date("projection", "start_date") {
        return Ok(date);
    }
    match config.get_string("projection", "start_date") {
        None => Err(CashflowError::ConfigMissing {
            section: "projection".to_string(),
            key: "start_date".to_string(),
        }),
        Some(_) => Err(CashflowError::ConfigInvalid {
            section: "projection".to_string(),
            key: "start_date".to_string(),
            reason: "invalid start_date format, expected YYYY-MM-DD".to_string(),
        }),
    }
}

fn window_end(start: NaiveDate, duration_days: u32) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(u64::from(duration_days)))
}

fn positive_days(section: &str, key: &str, value: i64) -> Result<u32, CashflowError> {
    if value <= 0 {
        return Err(CashflowError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive"),
        });
    }
    u32::try_from(value).map_err(|_| CashflowError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("{key} is too large"),
    })
}
