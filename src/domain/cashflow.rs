//! Cashflow rule model.
//!
//! A `Cashflow` answers one question: how much money moves on a given date.
//! Inflows are positive, outflows negative, and "nothing today" is `0.0`.
//!
//! - Leaves: `OneTime`, `Interval`, `Monthly`
//! - `Composite`: sums an ordered list of children
//! - Decorators: `StartOn`, `EndOn` gate a child by date, `Limited` caps the
//!   cumulative amount of a child (see [`crate::domain::limited`])
//!
//! Every node owns its children, so a rule tree has no sharing and no cycles.

use crate::domain::error::CashflowError;
use crate::domain::limited::Limited;
use chrono::{Datelike, NaiveDate};

pub const ALL_MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

#[derive(Debug, Clone, PartialEq)]
pub enum Cashflow {
    OneTime(OneTime),
    Interval(Interval),
    Monthly(Monthly),
    Composite(Composite),
    StartOn {
        start: NaiveDate,
        cashflow: Box<Cashflow>,
    },
    EndOn {
        end: NaiveDate,
        cashflow: Box<Cashflow>,
    },
    Limited(Limited),
}

impl Cashflow {
    /// Display name. Decorators report the name of the cashflow they wrap.
    pub fn name(&self) -> &str {
        match self {
            Cashflow::OneTime(c) => &c.name,
            Cashflow::Interval(c) => &c.name,
            Cashflow::Monthly(c) => &c.name,
            Cashflow::Composite(c) => &c.name,
            Cashflow::StartOn { cashflow, .. } | Cashflow::EndOn { cashflow, .. } => {
                cashflow.name()
            }
            Cashflow::Limited(l) => l.cashflow().name(),
        }
    }

    pub fn flow(&self, date: NaiveDate) -> f64 {
        match self {
            Cashflow::OneTime(c) => c.flow(date),
            Cashflow::Interval(c) => c.flow(date),
            Cashflow::Monthly(c) => c.flow(date),
            Cashflow::Composite(c) => c.flow(date),
            Cashflow::StartOn { start, cashflow } => {
                if date >= *start {
                    cashflow.flow(date)
                } else {
                    0.0
                }
            }
            Cashflow::EndOn { end, cashflow } => {
                if date <= *end {
                    cashflow.flow(date)
                } else {
                    0.0
                }
            }
            Cashflow::Limited(l) => l.flow(date),
        }
    }

    /// The directly wrapped cashflow of a decorator, `None` for leaves and composites.
    pub fn inner(&self) -> Option<&Cashflow> {
        match self {
            Cashflow::StartOn { cashflow, .. } | Cashflow::EndOn { cashflow, .. } => {
                Some(&**cashflow)
            }
            Cashflow::Limited(l) => Some(l.cashflow()),
            _ => None,
        }
    }

    pub fn start_on(self, start: NaiveDate) -> Cashflow {
        Cashflow::StartOn {
            start,
            cashflow: Box::new(self),
        }
    }

    pub fn end_on(self, end: NaiveDate) -> Cashflow {
        Cashflow::EndOn {
            end,
            cashflow: Box::new(self),
        }
    }

    /// Wrap in a [`Limited`] cap. Fails if the cap is never reached within
    /// `horizon_days` of `start`.
    pub fn limited(
        self,
        start: NaiveDate,
        limit: f64,
        horizon_days: u32,
    ) -> Result<Cashflow, CashflowError> {
        Ok(Cashflow::Limited(Limited::new(
            start,
            limit,
            self,
            horizon_days,
        )?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneTime {
    pub name: String,
    pub date: NaiveDate,
    pub amount: f64,
}

impl OneTime {
    pub fn new(name: impl Into<String>, date: NaiveDate, amount: f64) -> Self {
        Self {
            name: name.into(),
            date,
            amount,
        }
    }

    pub fn flow(&self, date: NaiveDate) -> f64 {
        if date == self.date { self.amount } else { 0.0 }
    }
}

/// Fires every `interval_days` days counting from `first_date`, which itself fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    name: String,
    first_date: NaiveDate,
    interval_days: i64,
    amount: f64,
}

impl Interval {
    pub fn new(
        name: impl Into<String>,
        first_date: NaiveDate,
        interval_days: i64,
        amount: f64,
    ) -> Result<Self, CashflowError> {
        if interval_days <= 0 {
            return Err(CashflowError::InvalidInterval {
                days: interval_days,
            });
        }
        Ok(Self {
            name: name.into(),
            first_date,
            interval_days,
            amount,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    pub fn interval_days(&self) -> i64 {
        self.interval_days
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn flow(&self, date: NaiveDate) -> f64 {
        let delta = (date - self.first_date).num_days();
        if delta >= 0 && delta % self.interval_days == 0 {
            self.amount
        } else {
            0.0
        }
    }
}

/// Fires on `day` of every month listed in `months`.
///
/// A day past the end of a month (31 in April) simply never matches that month.
#[derive(Debug, Clone, PartialEq)]
pub struct Monthly {
    name: String,
    day: u32,
    amount: f64,
    months: Vec<u32>,
}

impl Monthly {
    pub fn new(name: impl Into<String>, day: u32, amount: f64) -> Result<Self, CashflowError> {
        Self::with_months(name, day, amount, ALL_MONTHS.to_vec())
    }

    pub fn with_months(
        name: impl Into<String>,
        day: u32,
        amount: f64,
        months: Vec<u32>,
    ) -> Result<Self, CashflowError> {
        if !(1..=31).contains(&day) {
            return Err(CashflowError::InvalidMonthly {
                reason: format!("day of month must be between 1 and 31, got {day}"),
            });
        }
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(CashflowError::InvalidMonthly {
                reason: format!("month must be between 1 and 12, got {bad}"),
            });
        }
        Ok(Self {
            name: name.into(),
            day,
            amount,
            months,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn months(&self) -> &[u32] {
        &self.months
    }

    /// True when every calendar month is allowed.
    pub fn every_month(&self) -> bool {
        ALL_MONTHS.iter().all(|m| self.months.contains(m))
    }

    pub fn flow(&self, date: NaiveDate) -> f64 {
        if date.day() == self.day && self.months.contains(&date.month()) {
            self.amount
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub name: String,
    cashflows: Vec<Cashflow>,
}

impl Composite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cashflows: Vec::new(),
        }
    }

    /// Append a child. Order only matters for serialization.
    pub fn add(&mut self, cashflow: Cashflow) {
        self.cashflows.push(cashflow);
    }

    pub fn cashflows(&self) -> &[Cashflow] {
        &self.cashflows
    }

    pub fn flow(&self, date: NaiveDate) -> f64 {
        self.cashflows.iter().map(|c| c.flow(date)).sum()
    }
}

impl From<OneTime> for Cashflow {
    fn from(c: OneTime) -> Self {
        Cashflow::OneTime(c)
    }
}

impl From<Interval> for Cashflow {
    fn from(c: Interval) -> Self {
        Cashflow::Interval(c)
    }
}

impl From<Monthly> for Cashflow {
    fn from(c: Monthly) -> Self {
        Cashflow::Monthly(c)
    }
}

impl From<Composite> for Cashflow {
    fn from(c: Composite) -> Self {
        Cashflow::Composite(c)
    }
}

impl From<Limited> for Cashflow {
    fn from(l: Limited) -> Self {
        Cashflow::Limited(l)
    }
}
