// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{split, validate};
use crate::models::{Bill, SplitType};
use crate::store;
use crate::utils::{
    fmt_money, maybe_print_json, member_id_by_name, now_stamp, parse_decimal, parse_participants,
    pretty_table, resolve_group_id,
};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub),
        Some(("list", sub)) => list(conn, sub),
        Some(("rm", sub)) => {
            let id: i64 = sub.get_one::<String>("id").unwrap().parse()?;
            store::delete_bill(conn, id)?;
            println!("Deleted bill {}", id);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;

    let name = sub.get_one::<String>("name").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let split_type = SplitType::from_str(sub.get_one::<String>("split").unwrap())
        .map_err(|e| anyhow!(e))?;
    let created_by = member_id_by_name(&group, sub.get_one::<String>("paid-by").unwrap())?;

    let raw: Vec<String> = sub
        .get_many::<String>("with")
        .unwrap()
        .cloned()
        .collect();
    let (participants, inputs) = parse_participants(&group, &raw)?;

    let members = split::resolve_for_group(&group, split_type, amount, &participants, &inputs)?;
    validate::validate_bill_amount(amount, &members)?;

    let bill = Bill {
        id: 0, // assigned by the store
        group_id: group_id.clone(),
        name: name.clone(),
        amount,
        split_type,
        members,
        created_by,
        note: sub.get_one::<String>("note").cloned(),
        created_at: now_stamp(),
        payment_tracking: Vec::new(),
    };
    let id = store::insert_bill(conn, &bill)?;
    println!(
        "Recorded bill {} '{}' for {} ({} split over {} member(s))",
        id,
        name,
        fmt_money(&amount),
        split_type,
        bill.members.len()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    let bills = store::fetch_bills(conn, &group_id)?;

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &bills)? {
        return Ok(());
    }

    let rows = bills
        .iter()
        .map(|b| {
            let payer = group
                .member(&b.created_by)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| b.created_by.clone());
            vec![
                b.id.to_string(),
                b.name.clone(),
                fmt_money(&b.amount),
                b.split_type.to_string(),
                payer,
                b.members.len().to_string(),
                if crate::engine::settlement::is_fully_paid(b) {
                    "yes".into()
                } else {
                    String::new()
                },
                b.created_at.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Amount", "Split", "Paid by", "Members", "Settled", "Created"],
            rows
        )
    );
    Ok(())
}
