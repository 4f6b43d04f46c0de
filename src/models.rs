// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Per-member owed amounts for a bill: member id -> amount.
/// Keys are participants only; a zero owed amount never appears here.
pub type BillMember = BTreeMap<String, Decimal>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankInfo {
    pub bin: String,
    pub account_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_info: Option<BankInfo>,
    /// True for the designated accountant. At most one per group.
    #[serde(default)]
    pub is_accounting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTrackingMode {
    /// One member collects everyone's share.
    Accountant,
    /// Members settle with each other directly.
    Tracking,
}

impl PaymentTrackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTrackingMode::Accountant => "accountant",
            PaymentTrackingMode::Tracking => "tracking",
        }
    }
}

impl FromStr for PaymentTrackingMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accountant" => Ok(PaymentTrackingMode::Accountant),
            "tracking" => Ok(PaymentTrackingMode::Tracking),
            other => Err(format!(
                "unknown payment tracking mode '{}' (use accountant|tracking)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Insertion order is join order.
    pub members: Vec<Member>,
    pub payment_tracking_mode: PaymentTrackingMode,
    pub created_at: String,
    #[serde(default)]
    pub deleted: bool,
}

impl Group {
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn has_member(&self, id: &str) -> bool {
        self.member(id).is_some()
    }

    pub fn accountant(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_accounting)
    }
}

/// How a bill's total was split over its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitType {
    Equally,
    Exact,
    Percentage,
    Share,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equally => "equally",
            SplitType::Exact => "exact",
            SplitType::Percentage => "percentage",
            SplitType::Share => "share",
        }
    }
}

impl FromStr for SplitType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equally" => Ok(SplitType::Equally),
            "exact" => Ok(SplitType::Exact),
            "percentage" => Ok(SplitType::Percentage),
            "share" => Ok(SplitType::Share),
            other => Err(format!(
                "unknown split type '{}' (use equally|exact|percentage|share)",
                other
            )),
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One settlement event. Immutable once created; at most one per
/// (bill, member) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub member_id: String,
    pub paid_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub group_id: String,
    pub name: String,
    pub amount: Decimal,
    pub split_type: SplitType,
    pub members: BillMember,
    /// The payer's member id.
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub payment_tracking: Vec<PaymentEntry>,
}
