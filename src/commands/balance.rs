// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::balance::{aggregate, group_total};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, resolve_group_id};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    let bills = store::fetch_bills(conn, &group_id)?;

    let report = aggregate(&group, &bills);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let mut rows: Vec<Vec<String>> = report
        .values()
        .map(|row| {
            vec![
                row.name.clone(),
                fmt_money(&row.paid),
                fmt_money(&row.spent),
                fmt_money(&row.balance),
                if row.settled { "yes".into() } else { "no".into() },
            ]
        })
        .collect();

    let total = group_total(&report);
    rows.push(vec![
        "Group total".into(),
        fmt_money(&total.paid),
        fmt_money(&total.spent),
        fmt_money(&total.balance),
        String::new(),
    ]);

    println!(
        "{}",
        pretty_table(&["Member", "Paid", "Spent", "Balance", "Settled"], rows)
    );
    Ok(())
}
