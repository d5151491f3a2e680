//! Holding-Period Classifier
//!
//! Decides whether a redemption is short-term or long-term for capital-gains
//! purposes from the number of whole days the units were held.

use chrono::NaiveDate;
use fund_core::{FundError, FundResult};
use serde::{Deserialize, Serialize};

/// Days to qualify for long-term treatment unless configured otherwise
pub const DEFAULT_LONG_TERM_THRESHOLD_DAYS: u32 = 365;

/// Holding period classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingPeriod {
    ShortTerm,
    LongTerm,
}

impl std::fmt::Display for HoldingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldingPeriod::ShortTerm => write!(f, "STCG"),
            HoldingPeriod::LongTerm => write!(f, "LTCG"),
        }
    }
}

/// Outcome of classifying a single purchase/sale pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingClassification {
    /// Whole days between purchase and sale
    pub holding_days: i64,
    /// Whether the threshold was reached
    pub is_long_term: bool,
}

impl HoldingClassification {
    pub fn period(&self) -> HoldingPeriod {
        if self.is_long_term {
            HoldingPeriod::LongTerm
        } else {
            HoldingPeriod::ShortTerm
        }
    }
}

/// Classify a holding. The threshold is inclusive: a lot held for exactly
/// `threshold_days` days is long-term.
pub fn classify_holding(
    purchase_date: NaiveDate,
    sale_date: NaiveDate,
    threshold_days: u32,
) -> FundResult<HoldingClassification> {
    if sale_date < purchase_date {
        return Err(FundError::InvalidDateRange {
            purchase_date,
            sale_date,
        });
    }

    let holding_days = (sale_date - purchase_date).num_days();

    Ok(HoldingClassification {
        holding_days,
        is_long_term: holding_days >= i64::from(threshold_days),
    })
}

/// [`classify_holding`] with the 365-day threshold.
pub fn classify_holding_default(
    purchase_date: NaiveDate,
    sale_date: NaiveDate,
) -> FundResult<HoldingClassification> {
    classify_holding(purchase_date, sale_date, DEFAULT_LONG_TERM_THRESHOLD_DAYS)
}

/// Days left until a lot bought on `purchase_date` turns long-term, counted
/// from `as_of`. `None` once the threshold has been reached.
pub fn days_until_long_term(
    purchase_date: NaiveDate,
    as_of: NaiveDate,
    threshold_days: u32,
) -> FundResult<Option<i64>> {
    let classification = classify_holding(purchase_date, as_of, threshold_days)?;

    if classification.is_long_term {
        Ok(None)
    } else {
        Ok(Some(i64::from(threshold_days) - classification.holding_days))
    }
}
