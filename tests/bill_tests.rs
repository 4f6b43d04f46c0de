// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use splitclip::engine::{split, validate, EngineError};
use splitclip::models::{Bill, Group, Member, PaymentTrackingMode, SplitType};
use splitclip::{db, store};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let group = Group {
        id: "trip".into(),
        name: "Trip".into(),
        members: ["an", "binh", "chi"]
            .iter()
            .map(|id| Member {
                id: id.to_string(),
                name: id.to_uppercase(),
                bank_info: None,
                is_accounting: false,
            })
            .collect(),
        payment_tracking_mode: PaymentTrackingMode::Tracking,
        created_at: "2025-05-01 08:00:00".into(),
        deleted: false,
    };
    store::create_group(&conn, &group).unwrap();
    conn
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn resolve_validate_persist_round_trip() {
    let conn = setup();
    let group = store::fetch_group(&conn, "trip").unwrap();

    let members = split::resolve_for_group(
        &group,
        SplitType::Equally,
        d("900"),
        &ids(&["an", "binh", "chi"]),
        &split::SplitInputs::new(),
    )
    .unwrap();
    validate::validate_bill_amount(d("900"), &members).unwrap();

    let bill = Bill {
        id: 0,
        group_id: "trip".into(),
        name: "Dinner".into(),
        amount: d("900"),
        split_type: SplitType::Equally,
        members,
        created_by: "an".into(),
        note: Some("seafood".into()),
        created_at: "2025-05-02 19:30:00".into(),
        payment_tracking: Vec::new(),
    };
    let id = store::insert_bill(&conn, &bill).unwrap();

    let loaded = store::fetch_bill(&conn, id).unwrap();
    assert_eq!(loaded.amount, d("900"));
    assert_eq!(loaded.split_type, SplitType::Equally);
    assert_eq!(loaded.members.get("binh"), Some(&d("300")));
    assert_eq!(loaded.note.as_deref(), Some("seafood"));
    validate::validate(&loaded).unwrap();
}

#[test]
fn mismatched_bill_is_refused_before_persist() {
    let conn = setup();
    let group = store::fetch_group(&conn, "trip").unwrap();

    let mut members = split::resolve_for_group(
        &group,
        SplitType::Equally,
        d("900"),
        &ids(&["an", "binh", "chi"]),
        &split::SplitInputs::new(),
    )
    .unwrap();
    // Tampered member amount: off by a full unit.
    members.insert("chi".into(), d("301"));

    let err = validate::validate_bill_amount(d("900"), &members).unwrap_err();
    assert!(matches!(err, EngineError::AmountMismatch { .. }));
    // The gate failed, nothing was written.
    let bills = store::fetch_bills(&conn, "trip").unwrap();
    assert!(bills.is_empty());
}

#[test]
fn exact_split_persists_negative_amounts() {
    let conn = setup();
    let group = store::fetch_group(&conn, "trip").unwrap();

    let mut inputs = split::SplitInputs::new();
    inputs.insert("an".into(), d("700"));
    let members = split::resolve_for_group(
        &group,
        SplitType::Exact,
        d("500"),
        &ids(&["an", "binh"]),
        &inputs,
    )
    .unwrap();
    validate::validate_bill_amount(d("500"), &members).unwrap();

    let bill = Bill {
        id: 0,
        group_id: "trip".into(),
        name: "Refund case".into(),
        amount: d("500"),
        split_type: SplitType::Exact,
        members,
        created_by: "chi".into(),
        note: None,
        created_at: "2025-05-03 10:00:00".into(),
        payment_tracking: Vec::new(),
    };
    let id = store::insert_bill(&conn, &bill).unwrap();
    let loaded = store::fetch_bill(&conn, id).unwrap();
    assert_eq!(loaded.members.get("binh"), Some(&d("-100")));
}

#[test]
fn bill_add_through_cli_matches() {
    let conn = setup();
    store::set_active_group(&conn, "trip").unwrap();

    let matches = splitclip::cli::build_cli().get_matches_from([
        "splitclip", "bill", "add", "Taxi", "--amount", "300", "--split", "share", "--paid-by",
        "AN", "--with", "an=1", "--with", "binh=2",
    ]);
    if let Some(("bill", bill_m)) = matches.subcommand() {
        splitclip::commands::bills::handle(&conn, bill_m).unwrap();
    } else {
        panic!("no bill subcommand");
    }

    let bills = store::fetch_bills(&conn, "trip").unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].members.get("an"), Some(&d("100")));
    assert_eq!(bills[0].members.get("binh"), Some(&d("200")));
    assert_eq!(bills[0].created_by, "an");
}
