// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Split strategy resolver: turns a bill total plus raw per-member
//! inputs into the owed-amount mapping stored on the bill.

use crate::engine::EngineError;
use crate::models::{BillMember, Group, SplitType};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Raw per-member inputs. Meaning depends on the strategy: explicit
/// amounts for Exact, percentages for Percentage, share counts for
/// Share. Ignored by Equally. An absent or zero entry means
/// "unspecified".
pub type SplitInputs = BTreeMap<String, Decimal>;

/// Resolve a bill total into per-member owed amounts.
///
/// Every strategy upholds the same post-conditions: zero-valued entries
/// are dropped from the result, and the remaining values sum to
/// `amount` (within unit rounding, which the validator checks).
pub fn resolve(
    split_type: SplitType,
    amount: Decimal,
    participants: &[String],
    inputs: &SplitInputs,
) -> Result<BillMember, EngineError> {
    if participants.is_empty() {
        return Err(EngineError::InvalidInput(
            "a bill needs at least one participant".into(),
        ));
    }
    if amount < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "bill amount must not be negative, got {}",
            amount
        )));
    }
    match split_type {
        SplitType::Equally => split_equally(amount, participants),
        SplitType::Exact => split_exact(amount, participants, inputs),
        SplitType::Percentage => split_percentage(amount, participants, inputs),
        SplitType::Share => split_share(amount, participants, inputs),
    }
}

/// Like [`resolve`], but rejects participants outside the group roster.
pub fn resolve_for_group(
    group: &Group,
    split_type: SplitType,
    amount: Decimal,
    participants: &[String],
    inputs: &SplitInputs,
) -> Result<BillMember, EngineError> {
    for id in participants {
        if !group.has_member(id) {
            return Err(EngineError::UnknownMember(id.clone()));
        }
    }
    resolve(split_type, amount, participants, inputs)
}

fn split_equally(amount: Decimal, participants: &[String]) -> Result<BillMember, EngineError> {
    let per_head = amount / Decimal::from(participants.len() as u64);
    Ok(collect_nonzero(
        participants.iter().map(|id| (id.clone(), per_head)),
    ))
}

/// Explicit amounts for some participants; whoever is left unspecified
/// splits the remainder evenly. The remainder may be negative when the
/// explicit amounts exceed the total; it is not clamped.
fn split_exact(
    amount: Decimal,
    participants: &[String],
    inputs: &SplitInputs,
) -> Result<BillMember, EngineError> {
    let mut out: Vec<(String, Decimal)> = Vec::with_capacity(participants.len());
    let mut unspecified: Vec<&String> = Vec::new();
    let mut specified_total = Decimal::ZERO;

    for id in participants {
        match inputs.get(id).copied().filter(|v| !v.is_zero()) {
            Some(v) => {
                specified_total += v;
                out.push((id.clone(), v));
            }
            None => unspecified.push(id),
        }
    }

    if !unspecified.is_empty() {
        let per_head = (amount - specified_total) / Decimal::from(unspecified.len() as u64);
        for id in unspecified {
            out.push((id.clone(), per_head));
        }
    }

    Ok(collect_nonzero(out.into_iter()))
}

/// Percentages resolve through the same explicit-plus-even-remainder
/// pattern as Exact, over percentage points of the total: unspecified
/// participants split whatever percentage is left.
fn split_percentage(
    amount: Decimal,
    participants: &[String],
    inputs: &SplitInputs,
) -> Result<BillMember, EngineError> {
    let mut percents: Vec<(String, Decimal)> = Vec::with_capacity(participants.len());
    let mut unspecified: Vec<&String> = Vec::new();
    let mut specified_total = Decimal::ZERO;

    for id in participants {
        match inputs.get(id).copied().filter(|v| !v.is_zero()) {
            Some(p) => {
                specified_total += p;
                percents.push((id.clone(), p));
            }
            None => unspecified.push(id),
        }
    }

    if !unspecified.is_empty() {
        let per_head = (Decimal::ONE_HUNDRED - specified_total)
            / Decimal::from(unspecified.len() as u64);
        for id in unspecified {
            percents.push((id.clone(), per_head));
        }
    }

    Ok(collect_nonzero(percents.into_iter().map(|(id, pct)| {
        (id, amount * pct / Decimal::ONE_HUNDRED)
    })))
}

/// Distributes proportionally to share weight. Zero or unspecified
/// shares exclude the member from the result entirely.
fn split_share(
    amount: Decimal,
    participants: &[String],
    inputs: &SplitInputs,
) -> Result<BillMember, EngineError> {
    let mut weighted: Vec<(String, Decimal)> = Vec::new();
    let mut total_shares = Decimal::ZERO;

    for id in participants {
        let share = inputs.get(id).copied().unwrap_or(Decimal::ZERO);
        if share < Decimal::ZERO {
            return Err(EngineError::InvalidInput(format!(
                "share for '{}' must not be negative, got {}",
                id, share
            )));
        }
        if !share.is_zero() {
            total_shares += share;
            weighted.push((id.clone(), share));
        }
    }

    if total_shares.is_zero() {
        return Err(EngineError::InvalidInput(
            "at least one participant needs a nonzero share".into(),
        ));
    }

    Ok(collect_nonzero(weighted.into_iter().map(|(id, share)| {
        (id, amount * share / total_shares)
    })))
}

fn collect_nonzero(entries: impl Iterator<Item = (String, Decimal)>) -> BillMember {
    entries.filter(|(_, v)| !v.is_zero()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::round_unit;
    use crate::models::SplitType;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn inputs(pairs: &[(&str, &str)]) -> SplitInputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), d(v)))
            .collect()
    }

    #[test]
    fn equally_splits_evenly() {
        let out = resolve(SplitType::Equally, d("900"), &ids(&["a", "b", "c"]), &SplitInputs::new())
            .unwrap();
        assert_eq!(out.get("a"), Some(&d("300")));
        assert_eq!(out.get("b"), Some(&d("300")));
        assert_eq!(out.get("c"), Some(&d("300")));
    }

    #[test]
    fn equally_rejects_empty_participants() {
        let err = resolve(SplitType::Equally, d("900"), &[], &SplitInputs::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn negative_amount_rejected() {
        let err =
            resolve(SplitType::Equally, d("-5"), &ids(&["a"]), &SplitInputs::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn exact_unspecified_split_remainder() {
        let out = resolve(
            SplitType::Exact,
            d("1000"),
            &ids(&["a", "b", "c"]),
            &inputs(&[("a", "400")]),
        )
        .unwrap();
        assert_eq!(out.get("a"), Some(&d("400")));
        assert_eq!(out.get("b"), Some(&d("300")));
        assert_eq!(out.get("c"), Some(&d("300")));
    }

    #[test]
    fn exact_all_unspecified_degrades_to_equally() {
        let out = resolve(
            SplitType::Exact,
            d("600"),
            &ids(&["a", "b", "c"]),
            &SplitInputs::new(),
        )
        .unwrap();
        assert_eq!(out.get("a"), Some(&d("200")));
        assert_eq!(out.get("b"), Some(&d("200")));
        assert_eq!(out.get("c"), Some(&d("200")));
    }

    #[test]
    fn exact_overspecified_negative_remainder_not_clamped() {
        let out = resolve(
            SplitType::Exact,
            d("500"),
            &ids(&["a", "b"]),
            &inputs(&[("a", "700")]),
        )
        .unwrap();
        assert_eq!(out.get("a"), Some(&d("700")));
        assert_eq!(out.get("b"), Some(&d("-100")));
    }

    #[test]
    fn percentage_unspecified_split_remaining_percent() {
        // a takes 50%, b and c split the remaining 50% evenly.
        let out = resolve(
            SplitType::Percentage,
            d("400"),
            &ids(&["a", "b", "c"]),
            &inputs(&[("a", "50")]),
        )
        .unwrap();
        assert_eq!(out.get("a"), Some(&d("200")));
        assert_eq!(out.get("b"), Some(&d("100")));
        assert_eq!(out.get("c"), Some(&d("100")));
    }

    #[test]
    fn share_proportional() {
        let out = resolve(
            SplitType::Share,
            d("300"),
            &ids(&["a", "b"]),
            &inputs(&[("a", "1"), ("b", "2")]),
        )
        .unwrap();
        assert_eq!(out.get("a"), Some(&d("100")));
        assert_eq!(out.get("b"), Some(&d("200")));
    }

    #[test]
    fn share_zero_excluded_from_output() {
        let out = resolve(
            SplitType::Share,
            d("300"),
            &ids(&["a", "b", "c"]),
            &inputs(&[("a", "1"), ("b", "2"), ("c", "0")]),
        )
        .unwrap();
        assert!(!out.contains_key("c"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn share_all_zero_is_invalid() {
        let err = resolve(
            SplitType::Share,
            d("300"),
            &ids(&["a", "b"]),
            &inputs(&[("a", "0")]),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn conservation_across_strategies() {
        let participants = ids(&["a", "b", "c"]);
        let cases = [
            (SplitType::Equally, SplitInputs::new()),
            (SplitType::Exact, inputs(&[("a", "123.45")])),
            (SplitType::Percentage, inputs(&[("b", "33")])),
            (SplitType::Share, inputs(&[("a", "1"), ("b", "2"), ("c", "4")])),
        ];
        for (split_type, raw) in cases {
            let out = resolve(split_type, d("1000"), &participants, &raw).unwrap();
            let total: Decimal = out.values().copied().sum();
            assert_eq!(round_unit(total), d("1000"), "{:?}", split_type);
        }
    }

    #[test]
    fn unknown_participant_rejected_for_group() {
        use crate::models::{Group, Member, PaymentTrackingMode};
        let group = Group {
            id: "g1".into(),
            name: "Trip".into(),
            members: vec![Member {
                id: "a".into(),
                name: "An".into(),
                bank_info: None,
                is_accounting: false,
            }],
            payment_tracking_mode: PaymentTrackingMode::Tracking,
            created_at: "2025-01-01 00:00:00".into(),
            deleted: false,
        };
        let err = resolve_for_group(
            &group,
            SplitType::Equally,
            d("100"),
            &ids(&["a", "ghost"]),
            &SplitInputs::new(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::UnknownMember("ghost".into()));
    }
}
