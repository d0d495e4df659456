//! Day-by-day projection of a set of cashflows.
//!
//! One row per date in `[start, start + duration_days)`, holding each
//! cashflow's own flow, the day's total, a label listing the non-zero flows,
//! the running balance, and `min_forward`: the lowest balance from that row to
//! the end of the table. A `min_forward` below zero warns of a shortfall ahead
//! even when today's balance is healthy.

use crate::domain::cashflow::Cashflow;
use chrono::NaiveDate;

pub const DATE_COLUMN: &str = "date";
pub const TOTAL_COLUMN: &str = "total";
pub const LABELS_COLUMN: &str = "labels";
pub const BALANCE_COLUMN: &str = "balance";
pub const MIN_FORWARD_COLUMN: &str = "min_forward";

/// Sum of every cashflow on a single date.
pub fn flow(cashflows: &[Cashflow], date: NaiveDate) -> f64 {
    cashflows.iter().map(|c| c.flow(date)).sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRow {
    pub date: NaiveDate,
    /// One entry per cashflow, in input order.
    pub flows: Vec<f64>,
    pub total: f64,
    pub labels: String,
    pub balance: f64,
    pub min_forward: f64,
}

impl ProjectionRow {
    /// Cells in [`Projection::header`] order. A cashflow with no flow that day
    /// is an empty cell.
    pub fn record(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.flows.len() + 5);
        cells.push(self.date.format("%Y-%m-%d").to_string());
        cells.extend(self.flows.iter().map(|&amount| {
            if amount != 0.0 {
                format!("{amount:.2}")
            } else {
                String::new()
            }
        }));
        cells.push(format!("{:.2}", self.total));
        cells.push(self.labels.clone());
        cells.push(format!("{:.2}", self.balance));
        cells.push(format!("{:.2}", self.min_forward));
        cells
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub names: Vec<String>,
    pub rows: Vec<ProjectionRow>,
}

impl Projection {
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.names.len() + 5);
        header.push(DATE_COLUMN.to_string());
        header.extend(self.names.iter().cloned());
        header.extend(
            [TOTAL_COLUMN, LABELS_COLUMN, BALANCE_COLUMN, MIN_FORWARD_COLUMN]
                .iter()
                .map(|c| c.to_string()),
        );
        header
    }

    pub fn rows(&self) -> &[ProjectionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Numeric column by name: a cashflow name (first match wins), `total`,
    /// `balance` or `min_forward`.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let values: Vec<f64> = match name {
            TOTAL_COLUMN => self.rows.iter().map(|r| r.total).collect(),
            BALANCE_COLUMN => self.rows.iter().map(|r| r.balance).collect(),
            MIN_FORWARD_COLUMN => self.rows.iter().map(|r| r.min_forward).collect(),
            _ => {
                let index = self.names.iter().position(|n| n == name)?;
                self.rows.iter().map(|r| r.flows[index]).collect()
            }
        };
        Some(values)
    }

    /// Date and value of the lowest balance in the table.
    pub fn lowest_balance(&self) -> Option<(NaiveDate, f64)> {
        let first = self.rows.first()?;
        self.rows
            .iter()
            .find(|r| r.balance == first.min_forward)
            .map(|r| (r.date, r.balance))
    }
}

pub fn project(
    cashflows: &[Cashflow],
    start: NaiveDate,
    duration_days: u32,
    starting_balance: f64,
) -> Projection {
    let days = start.iter_days().take(duration_days as usize);
    let mut rows = Vec::with_capacity(days.len());
    let mut balance = starting_balance;

    for date in days {
        let flows: Vec<f64> = cashflows.iter().map(|c| c.flow(date)).collect();
        let total = flow(cashflows, date);
        balance += total;
        rows.push(ProjectionRow {
            date,
            labels: labels(cashflows, &flows),
            flows,
            total,
            balance,
            min_forward: balance,
        });
    }

    let mut lowest = f64::INFINITY;
    for row in rows.iter_mut().rev() {
        lowest = lowest.min(row.balance);
        row.min_forward = lowest;
    }

    Projection {
        names: cashflows.iter().map(|c| c.name().to_string()).collect(),
        rows,
    }
}

fn labels(cashflows: &[Cashflow], flows: &[f64]) -> String {
    cashflows
        .iter()
        .zip(flows)
        .filter(|(_, amount)| **amount != 0.0)
        .map(|(c, amount)| format!("{}: {:.2}", c.name(), amount))
        .collect::<Vec<_>>()
        .join(", ")
}
