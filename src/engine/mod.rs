// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The settlement engine: pure, synchronous computation over immutable
//! inputs. Nothing here touches the database or the terminal; callers
//! feed it already-loaded groups and bills and persist what it returns.

pub mod balance;
pub mod settlement;
pub mod split;
pub mod validate;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("bill amount {declared} does not match member total {computed}")]
    AmountMismatch { declared: Decimal, computed: Decimal },
    #[error("member '{member_id}' is already settled on bill {bill_id}")]
    AlreadySettled { bill_id: i64, member_id: String },
    #[error("member '{0}' is not part of this group")]
    UnknownMember(String),
}

/// Ordinary rounding to the nearest whole currency unit. The `round_dp`
/// default is banker's rounding, which disagrees on .5 boundaries;
/// reconciliation wants ties away from zero.
pub fn round_unit(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
