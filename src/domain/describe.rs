//! Plain-text description of cashflow documents.
//!
//! Works on the document form so the text matches what would be stored:
//!
//! ```text
//! Pay (
//!     Bonus: 19650 on 2023-03-04
//!     Salary: 3301.28 every 14 days counting from 2019-01-11 starting on 2022-01-01
//! ) ending on 2022-12-31
//! ```

use crate::domain::document::{CashflowDocument, Details};

const INDENT: &str = "    ";
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn describe(document: &CashflowDocument) -> String {
    describe_indented(document, "")
}

pub fn describe_all(documents: &[CashflowDocument]) -> String {
    documents
        .iter()
        .map(describe)
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_indented(document: &CashflowDocument, indent: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();

    match &document.details {
        Details::Composite { cashflows } => {
            let child_indent = format!("{indent}{INDENT}");
            let mut lines = vec![format!("{indent}{} (", document.name)];
            lines.extend(
                cashflows
                    .iter()
                    .map(|c| describe_indented(c, &child_indent)),
            );
            tokens.push(")".to_string());
            tokens.extend(modifiers(document));
            lines.push(format!("{indent}{}", tokens.join(" ")));
            return lines.join("\n");
        }
        Details::OneTime { date, amount } => {
            tokens.push(format!("{}:", document.name));
            tokens.push(amount.to_string());
            tokens.push(format!("on {date}"));
        }
        Details::Interval {
            first_date,
            interval,
            amount,
        } => {
            tokens.push(format!("{}:", document.name));
            tokens.push(amount.to_string());
            tokens.push(format!("every {interval} days counting from {first_date}"));
        }
        Details::Monthly {
            day,
            amount,
            months,
        } => {
            tokens.push(format!("{}:", document.name));
            tokens.push(amount.to_string());
            tokens.push(format!("on day {day}"));
            if let Some(months) = months {
                let names: Vec<&str> = months
                    .iter()
                    .filter_map(|m| MONTH_NAMES.get((*m as usize).wrapping_sub(1)).copied())
                    .collect();
                tokens.push(format!("in {}", names.join(", ")));
            }
        }
    }

    tokens.extend(modifiers(document));
    format!("{indent}{}", tokens.join(" "))
}

fn modifiers(document: &CashflowDocument) -> Vec<String> {
    let mut modifiers = Vec::new();
    if let Some(start) = document.start {
        modifiers.push(format!("starting on {start}"));
    }
    if let Some(end) = document.end {
        modifiers.push(format!("ending on {end}"));
    }
    if let Some(limit) = document.limit {
        modifiers.push(format!("maximum {limit}"));
    }
    modifiers
}
