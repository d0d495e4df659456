//! Integration tests across the rule model, the document codec and the projector.
//!
//! Tests cover:
//! - Round trip of every supported tree shape through the document form and JSON text
//! - Exact decorator nesting rebuilt on decode
//! - Date windows, composite sums and the Limited cap seen through decoding
//! - Projection row count, running balance and forward minimum
//! - Load, decode, project and write through the port traits

mod common;

use approx::assert_relative_eq;
use cashflow::adapters::csv_projection_adapter::CsvProjectionAdapter;
use cashflow::domain::cashflow::{Cashflow, Composite};
use cashflow::domain::document::{
    self, CashflowDocument, DecodeOptions, Details, decode, decode_all, decode_with, encode,
    encode_all,
};
use cashflow::domain::error::CashflowError;
use cashflow::domain::projection::{flow, project};
use cashflow::ports::cashflow_port::CashflowPort;
use cashflow::ports::projection_port::ProjectionPort;
use common::*;

mod round_trip {
    use super::*;

    #[test]
    fn every_shape_evaluates_identically_after_decode() {
        for original in shapes() {
            let back = decode(&encode(&original)).unwrap();
            for d in window(date(2016, 6, 1), 730) {
                assert_eq!(
                    back.flow(d),
                    original.flow(d),
                    "{} differs on {d}",
                    original.name()
                );
            }
        }
    }

    #[test]
    fn canonical_shapes_rebuild_the_same_tree() {
        for original in shapes() {
            let back = decode(&encode(&original)).unwrap();
            assert_eq!(back, original);
        }
    }

    #[test]
    fn json_text_round_trip() {
        for original in shapes() {
            let json = document::to_json(&original).unwrap();
            let back = document::from_json(&json).unwrap();
            assert_eq!(back, original, "{json}");
        }
    }

    #[test]
    fn merged_gates_evaluate_identically_after_decode() {
        for original in merged_shapes() {
            let doc = encode(&original);
            let json = document::to_json(&original).unwrap();
            let back = decode(&doc).unwrap();
            let from_text = document::from_json(&json).unwrap();
            assert_ne!(back, original);
            for d in window(date(2016, 6, 1), 900) {
                assert_eq!(back.flow(d), original.flow(d), "{} differs on {d}", original.name());
                assert_eq!(from_text.flow(d), original.flow(d));
            }
        }
    }

    #[test]
    fn limited_over_a_later_start_keeps_the_later_start() {
        let doc = encode(&merged_shapes()[0]);
        assert_eq!(doc.start, Some(date(2017, 1, 6)));
        assert_eq!(doc.limit, Some(3000.0));

        let doc = encode(&merged_shapes()[1]);
        assert_eq!(doc.start, Some(date(2017, 1, 1)));
        assert_eq!(doc.end, Some(date(2017, 6, 30)));
    }

    #[test]
    fn bare_limited_gains_an_equivalent_start_gate() {
        let original = payday().limited(date(2016, 12, 1), 5000.0, HORIZON).unwrap();
        let back = decode(&encode(&original)).unwrap();
        assert!(matches!(back, Cashflow::StartOn { .. }));
        for d in window(date(2016, 6, 1), 730) {
            assert_eq!(back.flow(d), original.flow(d));
        }
    }

    #[test]
    fn composite_keeps_child_order() {
        let doc = encode(&household());
        let Details::Composite { cashflows } = &doc.details else {
            panic!("expected composite details");
        };
        let names: Vec<&str> = cashflows.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Tax", "Bonus"]);
    }
}

mod decoding {
    use super::*;

    #[test]
    fn nests_end_on_start_on_interval() {
        let json = r#"{"name":"Arup Pay","start":"2021-01-01","end":"2021-12-31","details":{"type":"interval","first_date":"2019-01-11","interval":14,"amount":3301.28}}"#;
        let cf = document::from_json(json).unwrap();

        let end_on = &cf;
        assert!(matches!(end_on, Cashflow::EndOn { .. }));
        let start_on = end_on.inner().unwrap();
        assert!(matches!(start_on, Cashflow::StartOn { .. }));
        let interval = start_on.inner().unwrap();
        assert!(matches!(interval, Cashflow::Interval(_)));

        // Paydays fall on 2020-12-25, 2021-01-08 ... 2021-12-24, 2022-01-07.
        assert_eq!(cf.flow(date(2020, 12, 25)), 0.0);
        assert_relative_eq!(cf.flow(date(2021, 1, 8)), 3301.28);
        assert_relative_eq!(cf.flow(date(2021, 12, 24)), 3301.28);
        assert_eq!(cf.flow(date(2022, 1, 7)), 0.0);
    }

    #[test]
    fn limit_and_start_build_start_on_limited() {
        let json = r#"{"name":"Car loan","start":"2021-01-01","limit":-1000,
            "details":{"type":"monthly","day":5,"amount":-300}}"#;
        let cf = document::from_json(json).unwrap();
        assert!(matches!(cf.inner(), Some(Cashflow::Limited(_))));

        let paid: f64 = window(date(2021, 1, 1), 365).map(|d| cf.flow(d)).sum();
        assert_relative_eq!(paid, -1000.0);
        assert_eq!(cf.flow(date(2021, 4, 5)), -100.0);
        assert_eq!(cf.flow(date(2021, 5, 5)), 0.0);
    }

    #[test]
    fn short_horizon_rejects_slow_limit() {
        let json = r#"{"name":"Saver","start":"2021-01-01","limit":10000,
            "details":{"type":"monthly","day":1,"amount":100}}"#;
        let doc = CashflowDocument::from_json(json).unwrap();
        let options = DecodeOptions {
            limit_horizon_days: 365,
        };
        assert!(matches!(
            decode_with(&doc, &options),
            Err(CashflowError::LimitNotReached { .. })
        ));
        assert!(decode(&doc).is_ok());
    }

    #[test]
    fn bad_type_propagates() {
        let json = r#"[
            {"name":"Ok","details":{"type":"one-time","date":"2021-01-01","amount":1}},
            {"name":"Bad","details":{"type":"daily","amount":1}}
        ]"#;
        match document::parse_documents(json) {
            Err(CashflowError::UnknownKind { kind }) => assert_eq!(kind, "daily"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }
}

mod evaluation {
    use super::*;

    #[test]
    fn start_end_window_is_inclusive_and_exact() {
        let (s, e) = (date(2017, 1, 1), date(2017, 6, 30));
        let inner = payday();
        let gated = payday().end_on(e).start_on(s);
        for d in window(date(2016, 10, 1), 400) {
            if d < s || d > e {
                assert_eq!(gated.flow(d), 0.0, "{d}");
            } else {
                assert_eq!(gated.flow(d), inner.flow(d), "{d}");
            }
        }
    }

    #[test]
    fn composite_equals_sum_of_children() {
        let children = vec![payday(), rent(), quarterly_tax(), bonus()];
        let mut composite = Composite::new("All");
        for c in children.clone() {
            composite.add(c);
        }
        for d in window(date(2016, 10, 1), 500) {
            let sum: f64 = children.iter().map(|c| c.flow(d)).sum();
            assert_eq!(composite.flow(d), sum);
            assert_eq!(flow(&children, d), sum);
        }
    }

    #[test]
    fn limited_table_never_exceeds_limit() {
        let cf = household()
            .limited(date(2017, 1, 1), 3333.0, HORIZON)
            .unwrap();
        let Cashflow::Limited(limited) = &cf else {
            panic!("expected Limited");
        };
        let mut running = 0.0_f64;
        for amount in limited.capping_table().values() {
            running += amount;
            assert!(running.abs() <= 3333.0 + 1e-9);
        }
    }
}

mod projection {
    use super::*;

    #[test]
    fn payday_and_rent_for_180_days() {
        let cashflows = vec![payday(), rent()];
        let p = project(&cashflows, date(2016, 10, 21), 180, 0.0);

        assert_eq!(p.len(), 180);
        let mut running = 0.0;
        for row in p.rows() {
            running += row.total;
            assert_relative_eq!(row.balance, running);
        }
        // 13 paydays and 6 rents in the window.
        assert_relative_eq!(running, 13.0 * 1000.0 - 6.0 * 600.0);
    }

    #[test]
    fn min_forward_flags_a_future_shortfall() {
        let cashflows = vec![
            rent(),
            payday().start_on(date(2016, 11, 15)),
        ];
        let p = project(&cashflows, date(2016, 10, 25), 30, 300.0);
        // Rent lands on 2016-11-01 before the first payday on 2016-11-18.
        assert_eq!(p.rows[0].balance, 300.0);
        assert_eq!(p.rows[0].min_forward, -300.0);
        assert_eq!(p.lowest_balance(), Some((date(2016, 11, 1), -300.0)));
    }
}

mod ports {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_decode_project_write() {
        let port = MemoryCashflowPort::new(encode_all(&[payday(), rent()]));
        let cashflows = decode_all(&port.load().unwrap(), &DecodeOptions::default()).unwrap();
        let p = project(&cashflows, date(2016, 10, 21), 60, 100.0);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        CsvProjectionAdapter::new().write(&p, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, p.header());
        let first = rdr.records().next().unwrap().unwrap();
        assert_eq!(&first[0], "2016-10-21");
        assert_eq!(&first[1], "1000.00");
        assert_eq!(&first[2], "");
        assert_eq!(&first[5], "1100.00");
    }

    #[test]
    fn save_normalizes_documents() {
        let port = MemoryCashflowPort::new(Vec::new());
        port.save(&encode_all(&shapes())).unwrap();
        let reloaded = decode_all(&port.load().unwrap(), &DecodeOptions::default()).unwrap();
        assert_eq!(reloaded, shapes());
    }
}
