// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Group, PaymentTrackingMode};
use crate::store;
use crate::utils::{now_stamp, pretty_table, resolve_group_id, slug};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub),
        Some(("list", _)) => list(conn),
        Some(("show", sub)) => show(conn, sub),
        Some(("use", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            // Fails on unknown or deleted groups.
            store::fetch_group(conn, id)?;
            store::set_active_group(conn, id)?;
            println!("Active group is now '{}'", id);
            Ok(())
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store::soft_delete_group(conn, id)?;
            println!("Deleted group '{}'", id);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn create(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let mode = PaymentTrackingMode::from_str(sub.get_one::<String>("mode").unwrap())
        .map_err(|e| anyhow!(e))?;
    let id = sub
        .get_one::<String>("id")
        .cloned()
        .unwrap_or_else(|| slug(name));
    if id.is_empty() {
        return Err(anyhow!("Group name '{}' does not produce a usable id", name));
    }
    let group = Group {
        id: id.clone(),
        name: name.clone(),
        members: Vec::new(),
        payment_tracking_mode: mode,
        created_at: now_stamp(),
        deleted: false,
    };
    store::create_group(conn, &group)?;
    store::set_active_group(conn, &id)?;
    println!("Created group '{}' ({}, mode: {})", name, id, mode.as_str());
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let rows = store::list_groups(conn)?
        .into_iter()
        .map(|(id, name, mode, created)| vec![id, name, mode, created])
        .collect();
    println!("{}", pretty_table(&["Id", "Name", "Mode", "Created"], rows));
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    println!(
        "{} ({}, mode: {}, created {})",
        group.name,
        group.id,
        group.payment_tracking_mode.as_str(),
        group.created_at
    );
    let rows = group
        .members
        .iter()
        .map(|m| {
            vec![
                m.id.clone(),
                m.name.clone(),
                m.bank_info
                    .as_ref()
                    .map(|b| format!("{}:{}", b.bin, b.account_number))
                    .unwrap_or_default(),
                if m.is_accounting { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Name", "Bank", "Accountant"], rows)
    );
    Ok(())
}
