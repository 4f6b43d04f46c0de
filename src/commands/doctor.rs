// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::validate;
use crate::store;
use anyhow::Result;
use rusqlite::Connection;

/// Integrity sweep over the whole ledger: bills that no longer
/// reconcile, payment entries pointing at unknown bills or
/// non-participants, and groups with more than one accountant.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut problems = 0usize;

    for (group_id, _, _, _) in store::list_groups(conn)? {
        let group = store::fetch_group(conn, &group_id)?;

        let accountants = group.members.iter().filter(|m| m.is_accounting).count();
        if accountants > 1 {
            problems += 1;
            println!(
                "group '{}': {} members flagged as accountant",
                group_id, accountants
            );
        }

        for bill in store::fetch_bills(conn, &group_id)? {
            if let Err(e) = validate::validate(&bill) {
                problems += 1;
                println!("bill {} '{}': {}", bill.id, bill.name, e);
            }
            for entry in &bill.payment_tracking {
                if !bill.members.contains_key(&entry.member_id) {
                    problems += 1;
                    println!(
                        "bill {}: payment entry for non-participant '{}'",
                        bill.id, entry.member_id
                    );
                }
            }
            for id in bill.members.keys() {
                if !group.has_member(id) {
                    println!(
                        "bill {}: participant '{}' is no longer in group '{}' (ignored in reports)",
                        bill.id, id, group_id
                    );
                }
            }
        }
    }

    let orphans: i64 = conn.query_row(
        "SELECT COUNT(*) FROM payment_tracking p LEFT JOIN bills b ON p.bill_id=b.id WHERE b.id IS NULL",
        [],
        |r| r.get(0),
    )?;
    if orphans > 0 {
        problems += 1;
        println!("{} payment entries reference missing bills", orphans);
    }

    if problems == 0 {
        println!("Ledger looks healthy");
    } else {
        println!("{} problem(s) found", problems);
    }
    Ok(())
}
