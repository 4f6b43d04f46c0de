// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BankInfo, Member};
use crate::store;
use crate::utils::{member_id_by_name, pretty_table, resolve_group_id, slug};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub),
        Some(("list", sub)) => list(conn, sub),
        Some(("set", sub)) => set(conn, sub),
        Some(("rm", sub)) => rm(conn, sub),
        _ => Ok(()),
    }
}

fn parse_bank(raw: &str) -> Result<BankInfo> {
    let (bin, account) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Bank info must be BIN:ACCOUNT, got '{}'", raw))?;
    Ok(BankInfo {
        bin: bin.trim().to_string(),
        account_number: account.trim().to_string(),
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    // Existence check; also rejects deleted groups.
    store::fetch_group(conn, &group_id)?;
    let name = sub.get_one::<String>("name").unwrap();
    let id = slug(name);
    if id.is_empty() {
        return Err(anyhow!("Member name '{}' does not produce a usable id", name));
    }
    let member = Member {
        id,
        name: name.clone(),
        bank_info: sub
            .get_one::<String>("bank")
            .map(|b| parse_bank(b))
            .transpose()?,
        is_accounting: sub.get_flag("accountant"),
    };
    store::add_member(conn, &group_id, &member)?;
    println!("Added member '{}' to group '{}'", name, group_id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
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

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    let name = sub.get_one::<String>("name").unwrap();
    let id = member_id_by_name(&group, name)?;
    let current = group
        .member(&id)
        .ok_or_else(|| anyhow!("Member '{}' not found", name))?;

    let updated = Member {
        id: id.clone(),
        name: sub
            .get_one::<String>("rename")
            .cloned()
            .unwrap_or_else(|| current.name.clone()),
        bank_info: match sub.get_one::<String>("bank") {
            Some(b) => Some(parse_bank(b)?),
            None => current.bank_info.clone(),
        },
        is_accounting: sub.get_flag("accountant") || current.is_accounting,
    };
    store::update_member(conn, &group_id, &updated)?;
    println!("Updated member '{}'", updated.name);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let group_id = resolve_group_id(conn, sub)?;
    let group = store::fetch_group(conn, &group_id)?;
    let name = sub.get_one::<String>("name").unwrap();
    let id = member_id_by_name(&group, name)?;
    store::remove_member(conn, &group_id, &id)?;
    println!("Removed member '{}'", name);
    Ok(())
}
