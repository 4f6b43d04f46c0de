// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Splitclip", "splitclip"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("splitclip.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS groups(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        payment_tracking_mode TEXT NOT NULL CHECK(payment_tracking_mode IN ('accountant','tracking')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        deleted INTEGER NOT NULL DEFAULT 0
    );

    -- rowid preserves join order
    CREATE TABLE IF NOT EXISTS members(
        group_id TEXT NOT NULL,
        id TEXT NOT NULL,
        name TEXT NOT NULL,
        bank_bin TEXT,
        bank_account TEXT,
        is_accounting INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY(group_id, id),
        FOREIGN KEY(group_id) REFERENCES groups(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS bills(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        group_id TEXT NOT NULL,
        name TEXT NOT NULL,
        amount TEXT NOT NULL,
        split_type TEXT NOT NULL CHECK(split_type IN ('equally','exact','percentage','share')),
        members TEXT NOT NULL, -- member id -> owed amount, JSON
        created_by TEXT NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(group_id) REFERENCES groups(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_bills_group ON bills(group_id);

    -- UNIQUE(bill_id, member_id) is the serialization point for the
    -- at-most-one-entry-per-pair invariant.
    CREATE TABLE IF NOT EXISTS payment_tracking(
        bill_id INTEGER NOT NULL,
        member_id TEXT NOT NULL,
        paid_at TEXT NOT NULL,
        UNIQUE(bill_id, member_id),
        FOREIGN KEY(bill_id) REFERENCES bills(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
