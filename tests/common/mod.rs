#![allow(dead_code)]

use cashflow::domain::cashflow::{Cashflow, Composite, Interval, Monthly, OneTime};
use cashflow::domain::document::CashflowDocument;
use cashflow::domain::error::CashflowError;
use cashflow::ports::cashflow_port::CashflowPort;
use chrono::NaiveDate;
use std::cell::RefCell;

pub const HORIZON: u32 = 3650;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Every day from `start`, `days` long.
pub fn window(start: NaiveDate, days: usize) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take(days)
}

pub fn payday() -> Cashflow {
    Interval::new("Payday", date(2016, 10, 21), 14, 1000.0)
        .unwrap()
        .into()
}

pub fn rent() -> Cashflow {
    Monthly::new("Rent", 1, -600.0).unwrap().into()
}

pub fn quarterly_tax() -> Cashflow {
    Monthly::with_months("Tax", 15, -250.0, vec![3, 6, 9, 12])
        .unwrap()
        .into()
}

pub fn bonus() -> Cashflow {
    OneTime::new("Bonus", date(2017, 3, 4), 1965.0).into()
}

pub fn household() -> Cashflow {
    let mut c = Composite::new("Household");
    c.add(rent());
    c.add(quarterly_tax());
    c.add(bonus().end_on(date(2017, 12, 31)));
    c.into()
}

/// Representative tree shapes, each in the canonical nesting a document decodes to.
pub fn shapes() -> Vec<Cashflow> {
    let mut nested = Composite::new("Everything");
    nested.add(household());
    nested.add(payday().start_on(date(2017, 1, 1)));

    vec![
        bonus(),
        payday(),
        rent(),
        quarterly_tax(),
        household(),
        nested.into(),
        payday().start_on(date(2017, 1, 1)),
        payday().end_on(date(2017, 6, 30)),
        payday()
            .start_on(date(2017, 1, 1))
            .end_on(date(2017, 6, 30)),
        payday()
            .limited(date(2016, 12, 1), 5000.0, HORIZON)
            .unwrap()
            .start_on(date(2016, 12, 1)),
        rent()
            .limited(date(2017, 1, 1), 2000.0, HORIZON)
            .unwrap()
            .start_on(date(2017, 1, 1))
            .end_on(date(2017, 12, 31)),
        household().start_on(date(2017, 2, 1)).end_on(date(2017, 9, 30)),
    ]
}

/// Trees the encoder has to merge, so they decode to a different but
/// equivalent nesting.
pub fn merged_shapes() -> Vec<Cashflow> {
    vec![
        payday()
            .start_on(date(2017, 1, 6))
            .limited(date(2016, 12, 1), 3000.0, HORIZON)
            .unwrap(),
        rent()
            .end_on(date(2017, 6, 30))
            .limited(date(2017, 1, 1), 2000.0, HORIZON)
            .unwrap(),
        payday()
            .start_on(date(2017, 3, 1))
            .start_on(date(2017, 1, 1))
            .end_on(date(2017, 6, 30))
            .end_on(date(2017, 9, 30)),
    ]
}

/// In-memory cashflow source.
pub struct MemoryCashflowPort {
    pub documents: RefCell<Vec<CashflowDocument>>,
}

impl MemoryCashflowPort {
    pub fn new(documents: Vec<CashflowDocument>) -> Self {
        Self {
            documents: RefCell::new(documents),
        }
    }
}

impl CashflowPort for MemoryCashflowPort {
    fn load(&self) -> Result<Vec<CashflowDocument>, CashflowError> {
        Ok(self.documents.borrow().clone())
    }

    fn save(&self, documents: &[CashflowDocument]) -> Result<(), CashflowError> {
        *self.documents.borrow_mut() = documents.to_vec();
        Ok(())
    }
}
