// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance aggregation: folds a group's bills and payment tracking into
//! per-member paid / spent / net totals. Read-only and order
//! independent.

use crate::engine::settlement::is_member_paid;
use crate::models::{Bill, Group};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct MemberBalance {
    pub name: String,
    /// Total fronted as payer.
    pub paid: Decimal,
    /// Total owed as participant.
    pub spent: Decimal,
    /// paid - spent.
    pub balance: Decimal,
    /// Settled on every bill this member participates in.
    pub settled: bool,
}

/// The synthetic group-total row. `balance` is zero whenever every bill
/// reconciles, since each bill adds its amount to exactly one `paid`
/// and distributes the same amount over `spent`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupTotal {
    pub paid: Decimal,
    pub spent: Decimal,
    pub balance: Decimal,
}

pub type BalanceReport = BTreeMap<String, MemberBalance>;

/// Folds `bills` into one record per current group member. Bills that
/// reference ids no longer in the group contribute nothing for those
/// ids; stale references never fail the report.
pub fn aggregate(group: &Group, bills: &[Bill]) -> BalanceReport {
    let mut report: BalanceReport = group
        .members
        .iter()
        .map(|m| {
            (
                m.id.clone(),
                MemberBalance {
                    name: m.name.clone(),
                    paid: Decimal::ZERO,
                    spent: Decimal::ZERO,
                    balance: Decimal::ZERO,
                    settled: true,
                },
            )
        })
        .collect();

    for bill in bills {
        if let Some(row) = report.get_mut(&bill.created_by) {
            row.paid += bill.amount;
        }
        for (id, amount) in &bill.members {
            if let Some(row) = report.get_mut(id) {
                row.spent += *amount;
                row.settled &= is_member_paid(bill, id);
            }
        }
    }

    for row in report.values_mut() {
        row.balance = row.paid - row.spent;
    }
    report
}

pub fn group_total(report: &BalanceReport) -> GroupTotal {
    let mut total = GroupTotal {
        paid: Decimal::ZERO,
        spent: Decimal::ZERO,
        balance: Decimal::ZERO,
    };
    for row in report.values() {
        total.paid += row.paid;
        total.spent += row.spent;
        total.balance += row.balance;
    }
    total
}
