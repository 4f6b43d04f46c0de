// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Amount reconciliation: a bill may only be persisted when its declared
//! total matches what its members owe.

use crate::engine::{round_unit, EngineError};
use crate::models::{Bill, BillMember};
use rust_decimal::Decimal;

/// Checks that `amount` equals the sum of the member mapping after each
/// side is independently rounded to the whole currency unit. Raw floats
/// are never compared.
pub fn validate_bill_amount(amount: Decimal, members: &BillMember) -> Result<(), EngineError> {
    let computed: Decimal = members.values().copied().sum();
    if round_unit(amount) != round_unit(computed) {
        return Err(EngineError::AmountMismatch {
            declared: amount,
            computed,
        });
    }
    Ok(())
}

pub fn validate(bill: &Bill) -> Result<(), EngineError> {
    validate_bill_amount(bill.amount, &bill.members)
}
