//! Year-by-year growth of a SIP, for charting the projection.

use fund_core::{round_to_minor_unit, FundResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::projector::{annuity_due_value, invested_after, SipPlan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyGrowth {
    /// 1-based plan year
    pub year: u32,
    pub months_elapsed: u32,
    pub invested: Decimal,
    pub value: Decimal,
    pub returns: Decimal,
}

/// One row per plan year; a trailing partial year gets its own row. The
/// last row always matches [`project_sip`](crate::project_sip).
pub fn growth_schedule(plan: &SipPlan) -> FundResult<Vec<YearlyGrowth>> {
    plan.validate()?;

    let rate = plan.periodic_rate();
    let months_per_period = plan.frequency.months_per_period();
    let years = plan.duration_months.div_ceil(12);

    (1..=years)
        .map(|year| {
            let months_elapsed = (year * 12).min(plan.duration_months);
            let periods = months_elapsed / months_per_period;

            let invested = round_to_minor_unit(invested_after(plan.periodic_amount, periods)?);
            let value = round_to_minor_unit(annuity_due_value(plan.periodic_amount, rate, periods)?);

            Ok(YearlyGrowth {
                year,
                months_elapsed,
                invested,
                value,
                returns: value - invested,
            })
        })
        .collect()
}
