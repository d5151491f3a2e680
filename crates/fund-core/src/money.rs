//! Fixed-point money helpers
//!
//! Amounts are carried as `Decimal` at full precision through a calculation
//! and rounded to the currency's minor unit once, at the end.

use crate::error::{FundError, FundResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Digits after the decimal point for the currency's minor unit (paise).
pub const MINOR_UNIT_DIGITS: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Round to the minor unit using banker's rounding (round-half-even).
pub fn round_to_minor_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointNearestEven)
}

/// `amount × percent / 100` without intermediate rounding.
pub fn percent_of(amount: Decimal, percent: Decimal) -> FundResult<Decimal> {
    amount
        .checked_mul(percent)
        .and_then(|v| v.checked_div(HUNDRED))
        .ok_or_else(|| FundError::overflow(format!("{}% of {}", percent, amount)))
}

/// Rates are percentages in the closed range [0, 100].
pub fn validate_percent(field: &str, value: Decimal) -> FundResult<()> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(FundError::config(format!(
            "{} must be between 0 and 100, got {}",
            field, value
        )));
    }
    Ok(())
}

pub fn validate_non_negative(field: &str, value: Decimal) -> FundResult<()> {
    if value < Decimal::ZERO {
        return Err(FundError::config(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Sum a sequence of amounts, failing instead of wrapping on overflow.
pub fn checked_sum<I>(amounts: I) -> FundResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, x| {
        acc.checked_add(x)
            .ok_or_else(|| FundError::overflow("sum of amounts"))
    })
}
