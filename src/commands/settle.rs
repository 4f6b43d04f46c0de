// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::settlement;
use crate::store;
use crate::utils::{member_id_by_name, now_stamp, pretty_table, resolve_group_id};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("mark", sub)) => mark(conn, sub),
        Some(("status", sub)) => status(conn, sub),
        _ => Ok(()),
    }
}

/// Batch marking: one member, many bills. Each bill settles (or fails)
/// on its own; successes are persisted even when a later bill fails.
fn mark(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    let member_id = member_id_by_name(&group, sub.get_one::<String>("member").unwrap())?;
    let strict = sub.get_flag("strict");
    let paid_at = now_stamp();

    let bill_ids: Vec<i64> = sub
        .get_many::<String>("bills")
        .unwrap()
        .map(|s| s.parse::<i64>())
        .collect::<Result<_, _>>()?;

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for bill_id in bill_ids {
        let outcome = store::fetch_bill(conn, bill_id).and_then(|bill| {
            let updated = settlement::mark_paid(&bill, &member_id, &paid_at, strict)?;
            // Only newly appended entries need writing; the unique
            // index keeps replays single.
            for entry in updated.payment_tracking.iter().skip(bill.payment_tracking.len()) {
                store::record_payment(conn, bill_id, &entry.member_id, &entry.paid_at)?;
            }
            Ok(())
        });
        match outcome {
            Ok(()) => {
                succeeded += 1;
                println!("bill {}: ok", bill_id);
            }
            Err(e) => {
                failed += 1;
                println!("bill {}: FAILED ({})", bill_id, e);
            }
        }
    }
    println!("Marked '{}' paid: {} ok, {} failed", member_id, succeeded, failed);
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let bill_id: i64 = sub.get_one::<String>("id").unwrap().parse()?;
    let bill = store::fetch_bill(conn, bill_id)?;
    let group = store::fetch_group(conn, &bill.group_id)?;

    let rows = bill
        .members
        .iter()
        .map(|(id, amount)| {
            let name = group
                .member(id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| id.clone());
            let why = if settlement::is_payer(&bill, id) {
                "payer"
            } else if settlement::owes_nothing(&bill, id) {
                "owes nothing"
            } else if settlement::has_payment_entry(&bill, id) {
                "paid"
            } else {
                ""
            };
            vec![
                name,
                crate::utils::fmt_money(amount),
                if settlement::is_member_paid(&bill, id) {
                    "yes".into()
                } else {
                    "no".into()
                },
                why.into(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Member", "Owes", "Settled", "Via"], rows)
    );
    println!(
        "Bill {} is {}",
        bill_id,
        if settlement::is_fully_paid(&bill) {
            "fully settled"
        } else {
            "still open"
        }
    );
    Ok(())
}
