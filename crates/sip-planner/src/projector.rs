//! SIP Future-Value Projector
//!
//! Projects the value of a systematic investment plan as an annuity-due:
//! every contribution is made at the start of its period and compounds once
//! per period at the periodic rate matching the contribution frequency.

use fund_core::{round_to_minor_unit, FundError, FundResult};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Longest plan accepted, in months (100 years)
pub const MAX_DURATION_MONTHS: u32 = 1200;

/// How often a contribution is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SipFrequency {
    Monthly,
    Quarterly,
}

impl SipFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            SipFrequency::Monthly => 12,
            SipFrequency::Quarterly => 4,
        }
    }

    pub fn months_per_period(&self) -> u32 {
        match self {
            SipFrequency::Monthly => 1,
            SipFrequency::Quarterly => 3,
        }
    }
}

impl std::fmt::Display for SipFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SipFrequency::Monthly => write!(f, "monthly"),
            SipFrequency::Quarterly => write!(f, "quarterly"),
        }
    }
}

/// A SIP as entered by the investor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipPlan {
    /// Amount invested every period
    pub periodic_amount: Decimal,
    /// Expected annual return, in percent
    pub annual_return_percent: Decimal,
    pub frequency: SipFrequency,
    pub duration_months: u32,
}

impl SipPlan {
    pub fn monthly(periodic_amount: Decimal, annual_return_percent: Decimal, duration_months: u32) -> Self {
        Self {
            periodic_amount,
            annual_return_percent,
            frequency: SipFrequency::Monthly,
            duration_months,
        }
    }

    pub fn quarterly(periodic_amount: Decimal, annual_return_percent: Decimal, duration_months: u32) -> Self {
        Self {
            periodic_amount,
            annual_return_percent,
            frequency: SipFrequency::Quarterly,
            duration_months,
        }
    }

    pub fn validate(&self) -> FundResult<()> {
        if self.periodic_amount <= Decimal::ZERO {
            return Err(FundError::config(format!(
                "periodic_amount must be positive, got {}",
                self.periodic_amount
            )));
        }
        if self.duration_months == 0 {
            return Err(FundError::config("duration_months must be at least 1"));
        }
        if self.duration_months > MAX_DURATION_MONTHS {
            return Err(FundError::config(format!(
                "duration_months must not exceed {}, got {}",
                MAX_DURATION_MONTHS, self.duration_months
            )));
        }
        if self.annual_return_percent < dec!(-100) {
            return Err(FundError::config(format!(
                "annual_return_percent must not be below -100, got {}",
                self.annual_return_percent
            )));
        }
        if self.duration_months % self.frequency.months_per_period() != 0 {
            return Err(FundError::config(format!(
                "duration of {} months is not a whole number of {} periods",
                self.duration_months, self.frequency
            )));
        }
        Ok(())
    }

    /// Number of contributions over the plan
    pub fn period_count(&self) -> u32 {
        self.duration_months / self.frequency.months_per_period()
    }

    /// Return per period: annual percent / 100 / periods per year
    pub fn periodic_rate(&self) -> Decimal {
        self.annual_return_percent / Decimal::ONE_HUNDRED
            / Decimal::from(self.frequency.periods_per_year())
    }
}

/// Projected outcome of a plan, rounded to the minor unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipProjection {
    pub total_invested: Decimal,
    pub estimated_returns: Decimal,
    pub future_value: Decimal,
    /// Contributions made over the plan
    pub periods: u32,
}

/// Project a plan's total contribution, future value and gain
pub fn project_sip(plan: &SipPlan) -> FundResult<SipProjection> {
    plan.validate()?;

    let periods = plan.period_count();
    let rate = plan.periodic_rate();

    let total_invested = invested_after(plan.periodic_amount, periods)?;
    let future_value = annuity_due_value(plan.periodic_amount, rate, periods)?;

    let total_invested = round_to_minor_unit(total_invested);
    let future_value = round_to_minor_unit(future_value);

    tracing::debug!(
        "Projected {} SIP of {} over {} periods at {}%: {}",
        plan.frequency,
        plan.periodic_amount,
        periods,
        plan.annual_return_percent,
        future_value
    );

    Ok(SipProjection {
        total_invested,
        estimated_returns: future_value - total_invested,
        future_value,
        periods,
    })
}

pub(crate) fn invested_after(amount: Decimal, periods: u32) -> FundResult<Decimal> {
    amount
        .checked_mul(Decimal::from(periods))
        .ok_or_else(|| FundError::overflow("total invested"))
}

/// `amount × [((1 + r)^n − 1) / r] × (1 + r)`, or `amount × n` when `r` is
/// zero. Unrounded.
pub(crate) fn annuity_due_value(amount: Decimal, rate: Decimal, periods: u32) -> FundResult<Decimal> {
    if rate.is_zero() {
        return invested_after(amount, periods);
    }

    let growth = Decimal::ONE + rate;
    let factor = compound_factor(growth, periods)?;

    (factor - Decimal::ONE)
        .checked_div(rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_mul(amount))
        .ok_or_else(|| FundError::overflow("SIP future value"))
}

fn compound_factor(growth: Decimal, periods: u32) -> FundResult<Decimal> {
    growth
        .checked_powu(u64::from(periods))
        .ok_or_else(|| FundError::overflow("compounding factor"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_five_year_plan() {
        let plan = SipPlan::monthly(dec!(5000), dec!(12), 60);
        let projection = project_sip(&plan).unwrap();

        assert_eq!(projection.periods, 60);
        assert_eq!(projection.total_invested, dec!(300000));
        assert_eq!(projection.future_value, dec!(412431.83));
        assert_eq!(projection.estimated_returns, dec!(112431.83));
    }

    #[test]
    fn test_quarterly_uses_quarterly_rate() {
        // r = 12 / 100 / 4 = 3% per quarter, 20 quarters.
        let plan = SipPlan::quarterly(dec!(15000), dec!(12), 60);
        let projection = project_sip(&plan).unwrap();

        assert_eq!(projection.periods, 20);
        assert_eq!(plan.periodic_rate(), dec!(0.03));
        assert_eq!(projection.total_invested, dec!(300000));
        assert_eq!(projection.future_value, dec!(415147.29));
    }

    #[test]
    fn test_zero_return_is_linear() {
        for (amount, months) in [(dec!(5000), 60), (dec!(1234.56), 7), (dec!(0.01), 1)] {
            let plan = SipPlan::monthly(amount, Decimal::ZERO, months);
            let projection = project_sip(&plan).unwrap();

            assert_eq!(projection.future_value, amount * Decimal::from(months));
            assert_eq!(projection.future_value, projection.total_invested);
            assert_eq!(projection.estimated_returns, Decimal::ZERO);
        }
    }

    #[test]
    fn test_positive_return_beats_contributions() {
        for rate in [dec!(0.5), dec!(6), dec!(12), dec!(30)] {
            for plan in [
                SipPlan::monthly(dec!(1000), rate, 1),
                SipPlan::monthly(dec!(2500), rate, 36),
                SipPlan::quarterly(dec!(10000), rate, 120),
            ] {
                let projection = project_sip(&plan).unwrap();
                assert!(projection.future_value > projection.total_invested);
                assert_eq!(
                    projection.future_value,
                    projection.total_invested + projection.estimated_returns
                );
            }
        }
    }

    #[test]
    fn test_single_contribution_earns_one_period() {
        // Annuity-due: the only contribution still earns a full month.
        let projection = project_sip(&SipPlan::monthly(dec!(1000), dec!(12), 1)).unwrap();
        assert_eq!(projection.future_value, dec!(1010));
    }

    #[test]
    fn test_negative_return_loses_value() {
        let projection = project_sip(&SipPlan::monthly(dec!(1000), dec!(-12), 24)).unwrap();
        assert!(projection.future_value < projection.total_invested);
        assert!(projection.future_value > Decimal::ZERO);
        assert!(projection.estimated_returns < Decimal::ZERO);
    }

    #[test]
    fn test_total_loss_rate_is_accepted() {
        let projection = project_sip(&SipPlan::monthly(dec!(1000), dec!(-100), 12)).unwrap();
        assert!(projection.future_value < projection.total_invested);
    }

    #[test]
    fn test_invalid_plans_rejected() {
        let cases = [
            SipPlan::monthly(Decimal::ZERO, dec!(12), 12),
            SipPlan::monthly(dec!(-500), dec!(12), 12),
            SipPlan::monthly(dec!(500), dec!(12), 0),
            SipPlan::monthly(dec!(500), dec!(-100.01), 12),
            SipPlan::quarterly(dec!(500), dec!(12), 10),
        ];

        for plan in cases {
            let err = project_sip(&plan).unwrap_err();
            assert!(matches!(err, FundError::Configuration(_)), "{:?}", plan);
        }
    }

    #[test]
    fn test_duration_is_capped() {
        let longest = SipPlan::monthly(dec!(100), dec!(-12), MAX_DURATION_MONTHS);
        let projection = project_sip(&longest).unwrap();
        assert_eq!(projection.periods, 1200);

        for months in [MAX_DURATION_MONTHS + 1, u32::MAX] {
            let err = project_sip(&SipPlan::monthly(dec!(100), dec!(-12), months)).unwrap_err();
            assert!(matches!(err, FundError::Configuration(_)), "{}", months);
        }
    }

    #[test]
    fn test_compound_factor_matches_repeated_growth() {
        assert_eq!(compound_factor(dec!(1.01), 0).unwrap(), Decimal::ONE);
        assert_eq!(compound_factor(dec!(1.01), 2).unwrap(), dec!(1.0201));
        assert_eq!(compound_factor(Decimal::ZERO, 12).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_is_reported() {
        let plan = SipPlan::monthly(Decimal::MAX, dec!(12), 60);
        assert!(matches!(project_sip(&plan), Err(FundError::Overflow(_))));
    }

    #[test]
    fn test_plan_deserializes_from_json() {
        let plan: SipPlan = serde_json::from_str(
            r#"{"periodic_amount": 5000, "annual_return_percent": "12", "frequency": "Monthly", "duration_months": 60}"#,
        )
        .unwrap();
        assert_eq!(plan, SipPlan::monthly(dec!(5000), dec!(12), 60));
    }
}
