// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::validate;
use crate::models::{Bill, Group};
use crate::store;
use crate::utils::{now_stamp, slug};
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use serde::Deserialize;

#[derive(Deserialize)]
struct BackupPayload {
    group: Group,
    bills: Vec<Bill>,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("backup", sub)) => import_backup(conn, sub),
        _ => Ok(()),
    }
}

/// Restores a backup into a brand-new group. Every bill goes back
/// through the reconciliation validator before insert; a backup edited
/// into inconsistency is rejected wholesale.
fn import_backup(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open backup {}", path))?;
    let payload: BackupPayload =
        serde_json::from_str(&raw).context("Invalid backup data format")?;

    let name = sub
        .get_one::<String>("name")
        .cloned()
        .unwrap_or_else(|| payload.group.name.clone());
    let id = sub
        .get_one::<String>("id")
        .cloned()
        .unwrap_or_else(|| slug(&name));
    if id.is_empty() {
        return Err(anyhow!("Group name '{}' does not produce a usable id", name));
    }

    for bill in &payload.bills {
        validate::validate(bill)
            .with_context(|| format!("Backup bill '{}' does not reconcile", bill.name))?;
    }

    let tx = conn.transaction()?;
    let group = Group {
        id: id.clone(),
        name,
        created_at: now_stamp(),
        deleted: false,
        ..payload.group
    };
    store::create_group(&tx, &group)?;
    for bill in payload.bills {
        let bill = Bill {
            group_id: id.clone(),
            ..bill
        };
        store::insert_bill(&tx, &bill)?;
    }
    tx.commit()?;

    store::set_active_group(conn, &id)?;
    println!("Imported backup {} into new group '{}'", path, id);
    Ok(())
}
