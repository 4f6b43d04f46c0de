// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Payment tracking: which members have discharged their share of a
//! bill. All transformations are pure; callers persist the returned
//! bill.

use crate::engine::EngineError;
use crate::models::{Bill, PaymentEntry};
use rust_decimal::Decimal;

/// The payer never owes themselves.
pub fn is_payer(bill: &Bill, member_id: &str) -> bool {
    bill.created_by == member_id
}

/// A zero or negative owed amount counts as settled. Negative amounts
/// come out of over-specified exact splits.
pub fn owes_nothing(bill: &Bill, member_id: &str) -> bool {
    match bill.members.get(member_id) {
        Some(amount) => *amount <= Decimal::ZERO,
        None => false,
    }
}

pub fn has_payment_entry(bill: &Bill, member_id: &str) -> bool {
    bill.payment_tracking
        .iter()
        .any(|e| e.member_id == member_id)
}

pub fn is_member_paid(bill: &Bill, member_id: &str) -> bool {
    is_payer(bill, member_id) || owes_nothing(bill, member_id) || has_payment_entry(bill, member_id)
}

/// True when every participant on the bill is settled.
pub fn is_fully_paid(bill: &Bill) -> bool {
    bill.members.keys().all(|id| is_member_paid(bill, id))
}

/// Records a settlement event for one member, returning the updated
/// bill. Marking an already-settled member is a no-op unless `strict`,
/// in which case it fails; either way a second ledger entry is never
/// written.
pub fn mark_paid(
    bill: &Bill,
    member_id: &str,
    paid_at: &str,
    strict: bool,
) -> Result<Bill, EngineError> {
    if is_member_paid(bill, member_id) {
        if strict {
            return Err(EngineError::AlreadySettled {
                bill_id: bill.id,
                member_id: member_id.to_string(),
            });
        }
        return Ok(bill.clone());
    }
    let mut updated = bill.clone();
    updated.payment_tracking.push(PaymentEntry {
        member_id: member_id.to_string(),
        paid_at: paid_at.to_string(),
    });
    Ok(updated)
}

/// Per-bill result of a batch marking.
#[derive(Debug)]
pub struct BatchOutcome {
    pub bill_id: i64,
    pub result: Result<Bill, EngineError>,
}

/// Marks one member paid across many bills. A failure on one bill never
/// rolls back or aborts the others; callers get one outcome per input
/// bill, in input order. Already-settled members are a successful no-op
/// here so re-running a batch cannot duplicate entries.
pub fn mark_paid_batch(bills: &[Bill], member_id: &str, paid_at: &str) -> Vec<BatchOutcome> {
    bills
        .iter()
        .map(|bill| BatchOutcome {
            bill_id: bill.id,
            result: mark_paid(bill, member_id, paid_at, false),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillMember, SplitType};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn bill(id: i64, created_by: &str, members: &[(&str, &str)]) -> Bill {
        Bill {
            id,
            group_id: "g1".into(),
            name: format!("bill-{}", id),
            amount: members.iter().map(|(_, v)| d(v)).sum(),
            split_type: SplitType::Exact,
            members: members
                .iter()
                .map(|(k, v)| (k.to_string(), d(v)))
                .collect::<BillMember>(),
            created_by: created_by.into(),
            note: None,
            created_at: "2025-03-01 12:00:00".into(),
            payment_tracking: Vec::new(),
        }
    }

    const TS: &str = "2025-03-02 09:30:00";

    #[test]
    fn payer_is_trivially_settled() {
        let b = bill(1, "a", &[("a", "100"), ("b", "100")]);
        assert!(is_member_paid(&b, "a"));
        assert!(!is_member_paid(&b, "b"));
    }

    #[test]
    fn negative_owed_is_settled() {
        let b = bill(1, "a", &[("a", "700"), ("b", "-200")]);
        assert!(is_member_paid(&b, "b"));
    }

    #[test]
    fn explicit_entry_settles() {
        let b = bill(1, "a", &[("b", "100")]);
        assert!(!is_member_paid(&b, "b"));
        let b = mark_paid(&b, "b", TS, false).unwrap();
        assert!(is_member_paid(&b, "b"));
        assert_eq!(b.payment_tracking.len(), 1);
    }

    #[test]
    fn fully_paid_requires_every_participant() {
        let b = bill(1, "a", &[("a", "100"), ("b", "100"), ("c", "100")]);
        assert!(!is_fully_paid(&b));
        let b = mark_paid(&b, "b", TS, false).unwrap();
        assert!(!is_fully_paid(&b));
        let b = mark_paid(&b, "c", TS, false).unwrap();
        assert!(is_fully_paid(&b));
    }

    #[test]
    fn strict_re_mark_fails() {
        let b = bill(7, "a", &[("b", "100")]);
        let b = mark_paid(&b, "b", TS, true).unwrap();
        let err = mark_paid(&b, "b", TS, true).unwrap_err();
        assert_eq!(
            err,
            EngineError::AlreadySettled {
                bill_id: 7,
                member_id: "b".into(),
            }
        );
    }

    #[test]
    fn non_strict_re_mark_leaves_ledger_unchanged() {
        let b = bill(1, "a", &[("b", "100")]);
        let b = mark_paid(&b, "b", TS, false).unwrap();
        let again = mark_paid(&b, "b", "2025-03-03 10:00:00", false).unwrap();
        assert_eq!(again.payment_tracking.len(), 1);
        assert_eq!(again.payment_tracking[0].paid_at, TS);
    }

    #[test]
    fn batch_reports_per_bill_outcomes() {
        let b1 = bill(1, "a", &[("b", "100")]);
        // b is the payer on bill 2: no-op, still a success.
        let b2 = bill(2, "b", &[("a", "50")]);
        let b3 = bill(3, "c", &[("b", "30")]);
        let outcomes = mark_paid_batch(&[b1, b2, b3], "b", TS);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        assert_eq!(
            outcomes[0].result.as_ref().unwrap().payment_tracking.len(),
            1
        );
        assert_eq!(
            outcomes[1].result.as_ref().unwrap().payment_tracking.len(),
            0
        );
    }
}
