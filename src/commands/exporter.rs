// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::balance::{aggregate, group_total};
use crate::store;
use crate::utils::resolve_group_id;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => export_balances(conn, sub),
        Some(("backup", sub)) => export_backup(conn, sub),
        _ => Ok(()),
    }
}

fn export_balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    let bills = store::fetch_bills(conn, &group_id)?;
    let report = aggregate(&group, &bills);
    let total = group_total(&report);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["member", "paid", "spent", "balance", "settled"])?;
            for row in report.values() {
                wtr.write_record([
                    row.name.clone(),
                    row.paid.to_string(),
                    row.spent.to_string(),
                    row.balance.to_string(),
                    row.settled.to_string(),
                ])?;
            }
            wtr.write_record([
                "group total".to_string(),
                total.paid.to_string(),
                total.spent.to_string(),
                total.balance.to_string(),
                String::new(),
            ])?;
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(
                out,
                serde_json::to_string_pretty(&json!({
                    "group": group_id, "balances": report, "total": total
                }))?,
            )?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported balances to {}", out);
    Ok(())
}

/// The backup payload is the same `{ group, bills }` JSON the importer
/// reads back; bills re-validate on the way in, so a round trip always
/// reconciles.
fn export_backup(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    let bills = store::fetch_bills(conn, &group_id)?;

    std::fs::write(
        out,
        serde_json::to_string_pretty(&json!({ "group": group, "bills": bills }))?,
    )?;
    println!("Backed up group '{}' to {}", group_id, out);
    Ok(())
}
