// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use splitclip::engine::balance::{aggregate, group_total};
use splitclip::models::{Bill, BillMember, Group, Member, PaymentTrackingMode, SplitType};
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
        members: ["an", "binh"]
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

    let members: BillMember = [("an".to_string(), d("60")), ("binh".to_string(), d("40"))]
        .into_iter()
        .collect();
    let mut bill = Bill {
        id: 0,
        group_id: "trip".into(),
        name: "Lunch".into(),
        amount: d("100"),
        split_type: SplitType::Exact,
        members,
        created_by: "an".into(),
        note: None,
        created_at: "2025-05-02 12:00:00".into(),
        payment_tracking: Vec::new(),
    };
    let id = store::insert_bill(&conn, &bill).unwrap();
    bill.id = id;
    store::record_payment(&conn, id, "binh", "2025-05-03 09:00:00").unwrap();
    conn
}

fn run_import(conn: &mut Connection, path: &str, name: &str) -> anyhow::Result<()> {
    let matches = splitclip::cli::build_cli().get_matches_from([
        "splitclip", "import", "backup", path, "--name", name,
    ]);
    match matches.subcommand() {
        Some(("import", sub)) => splitclip::commands::importer::handle(conn, sub),
        _ => panic!("no import subcommand"),
    }
}

#[test]
fn backup_round_trip_preserves_balances_and_tracking() {
    let mut conn = setup();
    let group = store::fetch_group(&conn, "trip").unwrap();
    let bills = store::fetch_bills(&conn, "trip").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trip-backup.json");
    std::fs::write(
        &path,
        serde_json::to_string_pretty(&serde_json::json!({ "group": group, "bills": bills }))
            .unwrap(),
    )
    .unwrap();

    run_import(&mut conn, path.to_str().unwrap(), "Trip Restored").unwrap();

    let restored = store::fetch_group(&conn, "trip-restored").unwrap();
    assert_eq!(restored.members.len(), 2);
    let restored_bills = store::fetch_bills(&conn, "trip-restored").unwrap();
    assert_eq!(restored_bills.len(), 1);
    assert_eq!(restored_bills[0].amount, d("100"));
    // Payment tracking survives the round trip.
    assert_eq!(restored_bills[0].payment_tracking.len(), 1);

    let before = group_total(&aggregate(&group, &bills));
    let after = group_total(&aggregate(&restored, &restored_bills));
    assert_eq!(before.paid, after.paid);
    assert_eq!(before.spent, after.spent);
    assert_eq!(after.balance, Decimal::ZERO);
}

#[test]
fn tampered_backup_is_rejected() {
    let mut conn = setup();
    let group = store::fetch_group(&conn, "trip").unwrap();
    let mut bills = store::fetch_bills(&conn, "trip").unwrap();
    // Inflate the declared amount so it no longer reconciles.
    bills[0].amount = d("150");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad-backup.json");
    std::fs::write(
        &path,
        serde_json::to_string_pretty(&serde_json::json!({ "group": group, "bills": bills }))
            .unwrap(),
    )
    .unwrap();

    let err = run_import(&mut conn, path.to_str().unwrap(), "Broken").unwrap_err();
    assert!(err.to_string().contains("does not reconcile"));
    // Nothing was created.
    assert!(store::fetch_group(&conn, "broken").is_err());
}
