// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed reads and writes between SQLite rows and the model types. The
//! membership rules enforced here (unique names, single accountant,
//! removal blocked while bills reference a member) keep the engine's
//! inputs well formed.

use crate::models::{
    BankInfo, Bill, BillMember, Group, Member, PaymentEntry, PaymentTrackingMode, SplitType,
};
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

pub fn create_group(conn: &Connection, group: &Group) -> Result<()> {
    conn.execute(
        "INSERT INTO groups(id, name, payment_tracking_mode, created_at, deleted) \
         VALUES (?1,?2,?3,?4,0)",
        params![
            group.id,
            group.name,
            group.payment_tracking_mode.as_str(),
            group.created_at
        ],
    )
    .with_context(|| format!("Create group '{}'", group.id))?;
    for member in &group.members {
        insert_member_row(conn, &group.id, member)?;
    }
    Ok(())
}

pub fn fetch_group(conn: &Connection, id: &str) -> Result<Group> {
    let (name, mode, created_at, deleted): (String, String, String, bool) = conn
        .query_row(
            "SELECT name, payment_tracking_mode, created_at, deleted FROM groups WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .with_context(|| format!("Group '{}' not found", id))?;
    if deleted {
        return Err(anyhow!("Group '{}' was deleted", id));
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, bank_bin, bank_account, is_accounting \
         FROM members WHERE group_id=?1 ORDER BY rowid",
    )?;
    let members = stmt
        .query_map(params![id], |r| {
            let bin: Option<String> = r.get(2)?;
            let account: Option<String> = r.get(3)?;
            Ok(Member {
                id: r.get(0)?,
                name: r.get(1)?,
                bank_info: bin.zip(account).map(|(bin, account_number)| BankInfo {
                    bin,
                    account_number,
                }),
                is_accounting: r.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Group {
        id: id.to_string(),
        name,
        members,
        payment_tracking_mode: PaymentTrackingMode::from_str(&mode).map_err(|e| anyhow!(e))?,
        created_at,
        deleted,
    })
}

pub fn list_groups(conn: &Connection) -> Result<Vec<(String, String, String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, payment_tracking_mode, created_at FROM groups \
         WHERE deleted=0 ORDER BY created_at",
    )?;
    let rows = stmt
        .query_map([], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn soft_delete_group(conn: &Connection, id: &str) -> Result<()> {
    let n = conn.execute("UPDATE groups SET deleted=1 WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Group '{}' not found", id));
    }
    Ok(())
}

fn insert_member_row(conn: &Connection, group_id: &str, member: &Member) -> Result<()> {
    conn.execute(
        "INSERT INTO members(group_id, id, name, bank_bin, bank_account, is_accounting) \
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            group_id,
            member.id,
            member.name,
            member.bank_info.as_ref().map(|b| b.bin.as_str()),
            member.bank_info.as_ref().map(|b| b.account_number.as_str()),
            member.is_accounting
        ],
    )
    .with_context(|| format!("Add member '{}'", member.name))?;
    Ok(())
}

/// Adds a member. Names are unique within a group, and flagging the new
/// member as accountant clears the flag everywhere else.
pub fn add_member(conn: &Connection, group_id: &str, member: &Member) -> Result<()> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT id FROM members WHERE group_id=?1 AND name=?2",
            params![group_id, member.name],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(anyhow!(
            "Member '{}' already exists in this group, pick another name",
            member.name
        ));
    }
    if member.is_accounting {
        conn.execute(
            "UPDATE members SET is_accounting=0 WHERE group_id=?1",
            params![group_id],
        )?;
    }
    insert_member_row(conn, group_id, member)
}

pub fn update_member(conn: &Connection, group_id: &str, member: &Member) -> Result<()> {
    if member.is_accounting {
        conn.execute(
            "UPDATE members SET is_accounting=0 WHERE group_id=?1 AND id<>?2",
            params![group_id, member.id],
        )?;
    }
    let n = conn.execute(
        "UPDATE members SET name=?3, bank_bin=?4, bank_account=?5, is_accounting=?6 \
         WHERE group_id=?1 AND id=?2",
        params![
            group_id,
            member.id,
            member.name,
            member.bank_info.as_ref().map(|b| b.bin.as_str()),
            member.bank_info.as_ref().map(|b| b.account_number.as_str()),
            member.is_accounting
        ],
    )?;
    if n == 0 {
        return Err(anyhow!("Member '{}' not found", member.id));
    }
    Ok(())
}

/// Removal is blocked while any bill references the member as payer or
/// participant.
pub fn remove_member(conn: &Connection, group_id: &str, member_id: &str) -> Result<()> {
    let bills = fetch_bills(conn, group_id)?;
    if bills
        .iter()
        .any(|b| b.created_by == member_id || b.members.contains_key(member_id))
    {
        return Err(anyhow!(
            "Member '{}' created or participates in bills; delete those bills first",
            member_id
        ));
    }
    let n = conn.execute(
        "DELETE FROM members WHERE group_id=?1 AND id=?2",
        params![group_id, member_id],
    )?;
    if n == 0 {
        return Err(anyhow!("Member '{}' not found", member_id));
    }
    Ok(())
}

fn bill_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Bill> {
    let amount_s: String = r.get(3)?;
    let split_s: String = r.get(4)?;
    let members_json: String = r.get(5)?;
    Ok(Bill {
        id: r.get(0)?,
        group_id: r.get(1)?,
        name: r.get(2)?,
        amount: amount_s.parse().map_err(|_| {
            rusqlite::Error::InvalidColumnType(3, "amount".into(), rusqlite::types::Type::Text)
        })?,
        split_type: SplitType::from_str(&split_s).map_err(|_| {
            rusqlite::Error::InvalidColumnType(4, "split_type".into(), rusqlite::types::Type::Text)
        })?,
        members: serde_json::from_str::<BillMember>(&members_json).map_err(|_| {
            rusqlite::Error::InvalidColumnType(5, "members".into(), rusqlite::types::Type::Text)
        })?,
        created_by: r.get(6)?,
        note: r.get(7)?,
        created_at: r.get(8)?,
        payment_tracking: Vec::new(),
    })
}

pub fn fetch_bill(conn: &Connection, bill_id: i64) -> Result<Bill> {
    let mut bill = conn
        .query_row(
            "SELECT id, group_id, name, amount, split_type, members, created_by, note, created_at \
             FROM bills WHERE id=?1",
            params![bill_id],
            bill_from_row,
        )
        .with_context(|| format!("Bill {} not found", bill_id))?;
    bill.payment_tracking = fetch_payments(conn, bill_id)?;
    Ok(bill)
}

pub fn fetch_bills(conn: &Connection, group_id: &str) -> Result<Vec<Bill>> {
    let mut stmt = conn.prepare(
        "SELECT id, group_id, name, amount, split_type, members, created_by, note, created_at \
         FROM bills WHERE group_id=?1 ORDER BY id",
    )?;
    let mut bills = stmt
        .query_map(params![group_id], bill_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for bill in &mut bills {
        bill.payment_tracking = fetch_payments(conn, bill.id)?;
    }
    Ok(bills)
}

fn fetch_payments(conn: &Connection, bill_id: i64) -> Result<Vec<PaymentEntry>> {
    let mut stmt = conn.prepare(
        "SELECT member_id, paid_at FROM payment_tracking WHERE bill_id=?1 ORDER BY rowid",
    )?;
    let entries = stmt
        .query_map(params![bill_id], |r| {
            Ok(PaymentEntry {
                member_id: r.get(0)?,
                paid_at: r.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// Inserts a bill and returns its id. Callers are expected to have run
/// the bill through the validator first.
pub fn insert_bill(conn: &Connection, bill: &Bill) -> Result<i64> {
    conn.execute(
        "INSERT INTO bills(group_id, name, amount, split_type, members, created_by, note, created_at) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            bill.group_id,
            bill.name,
            bill.amount.to_string(),
            bill.split_type.as_str(),
            serde_json::to_string(&bill.members)?,
            bill.created_by,
            bill.note,
            bill.created_at
        ],
    )
    .with_context(|| format!("Insert bill '{}'", bill.name))?;
    let id = conn.last_insert_rowid();
    for entry in &bill.payment_tracking {
        record_payment(conn, id, &entry.member_id, &entry.paid_at)?;
    }
    Ok(id)
}

pub fn delete_bill(conn: &Connection, bill_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM payment_tracking WHERE bill_id=?1",
        params![bill_id],
    )?;
    let n = conn.execute("DELETE FROM bills WHERE id=?1", params![bill_id])?;
    if n == 0 {
        return Err(anyhow!("Bill {} not found", bill_id));
    }
    Ok(())
}

/// Writes one settlement event. The unique index makes a replay of the
/// same (bill, member) pair a no-op rather than a duplicate.
pub fn record_payment(conn: &Connection, bill_id: i64, member_id: &str, paid_at: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO payment_tracking(bill_id, member_id, paid_at) VALUES (?1,?2,?3) \
         ON CONFLICT(bill_id, member_id) DO NOTHING",
        params![bill_id, member_id, paid_at],
    )?;
    Ok(())
}

// Active group setting, so commands don't need --group every time.
pub fn get_active_group(conn: &Connection) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='active_group'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_active_group(conn: &Connection, group_id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('active_group', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![group_id],
    )?;
    Ok(())
}
