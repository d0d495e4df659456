//! JSON document form of a cashflow tree.
//!
//! Leaves and composites populate `name` and a `details` object tagged by
//! `type`. Decorators add no object of their own; they set top-level fields
//! on the document of the cashflow they wrap:
//!
//! - `Limited` sets `start` and `limit`
//! - `StartOn` sets `start`
//! - `EndOn` sets `end`
//!
//! Decoding rebuilds the leaf and then re-wraps in a fixed order: `Limited`
//! when both `start` and `limit` are present, `StartOn` when `start` is
//! present, `EndOn` when `end` is present. A document therefore decodes to
//! `EndOn(StartOn(Limited(leaf)))` with absent layers skipped.
//!
//! ```json
//! {
//!     "name": "Pay 2021",
//!     "start": "2021-01-01",
//!     "end": "2021-12-31",
//!     "details": { "type": "interval", "first_date": "2019-01-11", "interval": 14, "amount": 3301.28 }
//! }
//! ```

use crate::domain::cashflow::{Cashflow, Composite, Interval, Monthly, OneTime};
use crate::domain::error::CashflowError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default scan horizon for `Limited` when decoding: one hundred years.
pub const DEFAULT_LIMIT_HORIZON_DAYS: u32 = 36_525;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CashflowKind {
    OneTime,
    Interval,
    Monthly,
    Composite,
}

impl CashflowKind {
    pub const ALL: [CashflowKind; 4] = [
        CashflowKind::OneTime,
        CashflowKind::Interval,
        CashflowKind::Monthly,
        CashflowKind::Composite,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            CashflowKind::OneTime => "one-time",
            CashflowKind::Interval => "interval",
            CashflowKind::Monthly => "monthly",
            CashflowKind::Composite => "composite",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    pub details: Details,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Details {
    OneTime {
        date: NaiveDate,
        amount: f64,
    },
    Interval {
        first_date: NaiveDate,
        interval: i64,
        amount: f64,
    },
    Monthly {
        day: u32,
        amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        months: Option<Vec<u32>>,
    },
    Composite {
        cashflows: Vec<CashflowDocument>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub limit_horizon_days: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            limit_horizon_days: DEFAULT_LIMIT_HORIZON_DAYS,
        }
    }
}

impl CashflowDocument {
    pub fn from_json(json: &str) -> Result<Self, CashflowError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Every `details.type` in the tree is checked before typed decoding, so
    /// a bad tag surfaces as `MissingKind`/`UnknownKind` at any depth.
    pub fn from_value(value: Value) -> Result<Self, CashflowError> {
        check_kinds(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CashflowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_kinds(value: &Value) -> Result<(), CashflowError> {
    let details = value.get("details").ok_or(CashflowError::MissingKind)?;
    let tag = details.get("type").ok_or(CashflowError::MissingKind)?;
    let tag = tag.as_str().ok_or_else(|| CashflowError::UnknownKind {
        kind: tag.to_string(),
    })?;
    let kind = CashflowKind::from_tag(tag).ok_or_else(|| CashflowError::UnknownKind {
        kind: tag.to_string(),
    })?;

    if kind == CashflowKind::Composite {
        if let Some(children) = details.get("cashflows").and_then(Value::as_array) {
            for child in children {
                check_kinds(child)?;
            }
        }
    }
    Ok(())
}

/// Parse a file body holding either one document or a list of documents.
pub fn parse_documents(json: &str) -> Result<Vec<CashflowDocument>, CashflowError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items
            .into_iter()
            .map(CashflowDocument::from_value)
            .collect(),
        other => Ok(vec![CashflowDocument::from_value(other)?]),
    }
}

pub fn from_json(json: &str) -> Result<Cashflow, CashflowError> {
    decode(&CashflowDocument::from_json(json)?)
}

pub fn to_json(cashflow: &Cashflow) -> Result<String, CashflowError> {
    encode(cashflow).to_json_pretty()
}

pub fn decode(document: &CashflowDocument) -> Result<Cashflow, CashflowError> {
    decode_with(document, &DecodeOptions::default())
}

pub fn decode_with(
    document: &CashflowDocument,
    options: &DecodeOptions,
) -> Result<Cashflow, CashflowError> {
    let name = document.name.clone();
    let mut cashflow: Cashflow = match &document.details {
        Details::OneTime { date, amount } => OneTime::new(name, *date, *amount).into(),
        Details::Interval {
            first_date,
            interval,
            amount,
        } => Interval::new(name, *first_date, *interval, *amount)?.into(),
        Details::Monthly {
            day,
            amount,
            months,
        } => match months {
            Some(months) => Monthly::with_months(name, *day, *amount, months.clone())?,
            None => Monthly::new(name, *day, *amount)?,
        }
        .into(),
        Details::Composite { cashflows } => {
            let mut composite = Composite::new(name);
            for child in cashflows {
                composite.add(decode_with(child, options)?);
            }
            composite.into()
        }
    };

    match (document.start, document.limit) {
        (Some(start), Some(limit)) => {
            cashflow = cashflow.limited(start, limit, options.limit_horizon_days)?;
        }
        (None, Some(_)) => {
            log::warn!("{}: limit without start is ignored", document.name);
        }
        _ => {}
    }
    if let Some(start) = document.start {
        cashflow = cashflow.start_on(start);
    }
    if let Some(end) = document.end {
        cashflow = cashflow.end_on(end);
    }
    Ok(cashflow)
}

pub fn decode_all(
    documents: &[CashflowDocument],
    options: &DecodeOptions,
) -> Result<Vec<Cashflow>, CashflowError> {
    documents.iter().map(|d| decode_with(d, options)).collect()
}

/// Build the document for a cashflow tree.
///
/// Repeated gates merge: nested `StartOn` keep the latest start and nested
/// `EndOn` the earliest end. A `Limited` owns `start`; an outer gate that
/// would move it is dropped with a warning.
pub fn encode(cashflow: &Cashflow) -> CashflowDocument {
    match cashflow {
        Cashflow::OneTime(c) => leaf(
            &c.name,
            Details::OneTime {
                date: c.date,
                amount: c.amount,
            },
        ),
        Cashflow::Interval(c) => leaf(
            c.name(),
            Details::Interval {
                first_date: c.first_date(),
                interval: c.interval_days(),
                amount: c.amount(),
            },
        ),
        Cashflow::Monthly(c) => leaf(
            c.name(),
            Details::Monthly {
                day: c.day(),
                amount: c.amount(),
                months: if c.every_month() {
                    None
                } else {
                    Some(c.months().to_vec())
                },
            },
        ),
        Cashflow::Composite(c) => leaf(
            &c.name,
            Details::Composite {
                cashflows: c.cashflows().iter().map(encode).collect(),
            },
        ),
        Cashflow::StartOn { start, cashflow } => {
            let mut doc = encode(cashflow);
            match (doc.start, doc.limit) {
                (Some(existing), Some(_)) => {
                    if *start > existing {
                        log::warn!(
                            "{}: start {} after limit start {} cannot be stored, keeping {}",
                            doc.name,
                            start,
                            existing,
                            existing
                        );
                    }
                }
                (Some(existing), None) => doc.start = Some(existing.max(*start)),
                (None, _) => doc.start = Some(*start),
            }
            doc
        }
        Cashflow::EndOn { end, cashflow } => {
            let mut doc = encode(cashflow);
            doc.end = Some(doc.end.map_or(*end, |existing| existing.min(*end)));
            doc
        }
        Cashflow::Limited(l) => {
            let mut doc = encode(l.cashflow());
            if doc.limit.is_some() {
                log::warn!(
                    "{}: nested limit {} cannot be stored, keeping the inner limit",
                    doc.name,
                    l.limit()
                );
            } else {
                doc.start = Some(doc.start.map_or(l.start(), |s| s.max(l.start())));
                doc.limit = Some(l.limit());
            }
            doc
        }
    }
}

pub fn encode_all(cashflows: &[Cashflow]) -> Vec<CashflowDocument> {
    cashflows.iter().map(encode).collect()
}

fn leaf(name: &str, details: Details) -> CashflowDocument {
    CashflowDocument {
        name: name.to_string(),
        start: None,
        end: None,
        limit: None,
        details,
    }
}
