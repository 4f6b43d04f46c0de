// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::split::SplitInputs;
use anyhow::{anyhow, Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Current local time in the ledger's timestamp format.
pub fn now_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Member/group ids are lowercase name slugs: runs of
/// non-alphanumerics collapse into single hyphens.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            out.push('-');
            last_hyphen = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{}", d.round_dp(2).normalize())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Parses repeated `--with` values of the form `NAME` or `NAME=VALUE`
/// into the participant list and the raw split inputs, resolving names
/// to member ids through the group roster.
pub fn parse_participants(
    group: &crate::models::Group,
    raw: &[String],
) -> Result<(Vec<String>, SplitInputs)> {
    let mut participants = Vec::with_capacity(raw.len());
    let mut inputs = SplitInputs::new();
    for item in raw {
        let (name, value) = match item.split_once('=') {
            Some((n, v)) => (n.trim(), Some(v.trim())),
            None => (item.trim(), None),
        };
        let id = member_id_by_name(group, name)?;
        if let Some(v) = value {
            inputs.insert(id.clone(), parse_decimal(v)?);
        }
        participants.push(id);
    }
    Ok((participants, inputs))
}

/// Accepts a member name or id; names win when both match.
pub fn member_id_by_name(group: &crate::models::Group, name: &str) -> Result<String> {
    if let Some(m) = group
        .members
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
    {
        return Ok(m.id.clone());
    }
    if let Some(m) = group.members.iter().find(|m| m.id == name) {
        return Ok(m.id.clone());
    }
    Err(anyhow!("Member '{}' not found in group", name))
}

/// The group a command operates on: the --group argument when given,
/// otherwise the active group set via `group use`.
pub fn resolve_group_id(conn: &Connection, m: &clap::ArgMatches) -> Result<String> {
    if let Some(id) = m.get_one::<String>("group") {
        return Ok(id.clone());
    }
    crate::store::get_active_group(conn)?
        .ok_or_else(|| anyhow!("No group selected; pass --group or run `splitclip group use <id>`"))
}
