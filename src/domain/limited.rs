//! Cumulative cap on a wrapped cashflow.
//!
//! `Limited` scans its child day by day from `start`, once, at construction.
//! Flows pass through unchanged while the running signed sum stays strictly
//! inside `±|limit|`. The first flow that would reach or cross the bound is
//! trimmed so the running sum lands exactly on it, and the scan stops: every
//! later date contributes zero. The result is stored as a capping table and
//! never changes afterwards.
//!
//! The scan is bounded by `horizon_days`; a child that never reaches the cap
//! inside the horizon is rejected with [`CashflowError::LimitNotReached`].

use crate::domain::cashflow::Cashflow;
use crate::domain::error::CashflowError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Flows at or below this magnitude are treated as float noise and skipped.
pub const FLOW_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Limited {
    start: NaiveDate,
    limit: f64,
    cashflow: Box<Cashflow>,
    caps: BTreeMap<NaiveDate, f64>,
}

impl Limited {
    pub fn new(
        start: NaiveDate,
        limit: f64,
        cashflow: Cashflow,
        horizon_days: u32,
    ) -> Result<Self, CashflowError> {
        let caps = build_capping_table(&cashflow, start, limit.abs(), horizon_days)
            .ok_or(CashflowError::LimitNotReached {
                limit,
                horizon_days,
            })?;
        Ok(Self {
            start,
            limit,
            cashflow: Box::new(cashflow),
            caps,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The limit as given; only its magnitude is used for capping.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn cashflow(&self) -> &Cashflow {
        &self.cashflow
    }

    pub fn capping_table(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.caps
    }

    /// Date on which the cap was reached.
    pub fn capped_on(&self) -> Option<NaiveDate> {
        self.caps.keys().next_back().copied()
    }

    pub fn flow(&self, date: NaiveDate) -> f64 {
        self.caps.get(&date).copied().unwrap_or(0.0)
    }
}

fn build_capping_table(
    cashflow: &Cashflow,
    start: NaiveDate,
    max: f64,
    horizon_days: u32,
) -> Option<BTreeMap<NaiveDate, f64>> {
    let mut caps = BTreeMap::new();
    let mut total = 0.0_f64;

    for date in start.iter_days().take(horizon_days as usize) {
        let amount = cashflow.flow(date);
        if amount.abs() <= FLOW_EPSILON {
            continue;
        }

        let next = total + amount;
        if next.abs() < max {
            caps.insert(date, amount);
            total = next;
        } else {
            caps.insert(date, next.signum() * max - total);
            log::debug!(
                "{}: limit {} reached on {} after {} flows",
                cashflow.name(),
                max,
                date,
                caps.len()
            );
            return Some(caps);
        }
    }

    None
}
