//! Capital-Gains Tax Calculator
//!
//! Computes STCG/LTCG tax owed on a set of redemptions.

use chrono::NaiveDate;
use fund_core::{
    checked_sum, percent_of, round_to_minor_unit, validate_non_negative, validate_percent,
    FundError, FundResult,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::financial_year::FinancialYear;
use crate::holding_period::{
    classify_holding, HoldingClassification, HoldingPeriod, DEFAULT_LONG_TERM_THRESHOLD_DAYS,
};

/// A redemption with its realized gain or loss
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedGain {
    /// Scheme name or folio reference, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    pub sale_proceeds: Decimal,
    pub cost_basis: Decimal,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
}

impl RealizedGain {
    pub fn new(
        sale_proceeds: Decimal,
        cost_basis: Decimal,
        purchase_date: NaiveDate,
        sale_date: NaiveDate,
    ) -> Self {
        Self {
            scheme: None,
            sale_proceeds,
            cost_basis,
            purchase_date,
            sale_date,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Proceeds minus cost; negative for a loss
    pub fn gain(&self) -> FundResult<Decimal> {
        self.sale_proceeds
            .checked_sub(self.cost_basis)
            .ok_or_else(|| FundError::overflow("sale proceeds minus cost basis"))
    }

    pub fn classify(&self, threshold_days: u32) -> FundResult<HoldingClassification> {
        classify_holding(self.purchase_date, self.sale_date, threshold_days)
    }
}

/// Capital-gains tax rates, as percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    pub short_term_rate: Decimal,
    pub long_term_rate: Decimal,
    /// Long-term gains up to this amount are not taxed
    pub long_term_exemption_amount: Decimal,
}

impl TaxRates {
    /// Listed equity funds before the July 2024 revision
    pub fn india_equity() -> Self {
        Self {
            short_term_rate: dec!(15),
            long_term_rate: dec!(10),
            long_term_exemption_amount: dec!(100000),
        }
    }

    /// Listed equity funds from July 23, 2024
    pub fn india_equity_2024() -> Self {
        Self {
            short_term_rate: dec!(20),
            long_term_rate: dec!(12.5),
            long_term_exemption_amount: dec!(125000),
        }
    }

    pub fn validate(&self) -> FundResult<()> {
        validate_percent("short_term_rate", self.short_term_rate)?;
        validate_percent("long_term_rate", self.long_term_rate)?;
        validate_non_negative("long_term_exemption_amount", self.long_term_exemption_amount)?;
        Ok(())
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        Self::india_equity()
    }
}

/// How short-term losses are treated against short-term gains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossNetting {
    /// Each lot is floored at zero; a loss never offsets another lot's gain
    #[default]
    PerLot,
    /// Short-term gains and losses are netted first, then floored for tax
    NetThenFloor,
}

/// Aggregate tax outcome, rounded to the minor unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub short_term_gain_total: Decimal,
    pub long_term_gain_total: Decimal,
    pub long_term_exemption_used: Decimal,
    pub taxable_long_term_gain: Decimal,
    pub short_term_tax: Decimal,
    pub long_term_tax: Decimal,
    pub total_tax: Decimal,
}

/// Per-lot row of a tax report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotTaxDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub gain: Decimal,
    pub holding_days: i64,
    pub holding_period: HoldingPeriod,
}

/// Tax summary with the lots it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_year: Option<FinancialYear>,
    pub summary: TaxResult,
    pub lots: Vec<LotTaxDetail>,
}

/// Tax calculator for a validated set of rates
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    rates: TaxRates,
    long_term_threshold_days: u32,
    loss_netting: LossNetting,
}

impl TaxCalculator {
    /// Create a calculator, rejecting out-of-range rates up front
    pub fn new(rates: TaxRates) -> FundResult<Self> {
        if let Err(e) = rates.validate() {
            tracing::warn!("Rejected tax rates {:?}: {}", rates, e);
            return Err(e);
        }

        Ok(Self {
            rates,
            long_term_threshold_days: DEFAULT_LONG_TERM_THRESHOLD_DAYS,
            loss_netting: LossNetting::default(),
        })
    }

    pub fn with_threshold(mut self, long_term_threshold_days: u32) -> Self {
        self.long_term_threshold_days = long_term_threshold_days;
        self
    }

    pub fn with_loss_netting(mut self, loss_netting: LossNetting) -> Self {
        self.loss_netting = loss_netting;
        self
    }

    pub fn rates(&self) -> &TaxRates {
        &self.rates
    }

    pub fn long_term_threshold_days(&self) -> u32 {
        self.long_term_threshold_days
    }

    pub fn loss_netting(&self) -> LossNetting {
        self.loss_netting
    }

    /// Aggregate tax over all gains
    pub fn compute(&self, gains: &[RealizedGain]) -> FundResult<TaxResult> {
        Ok(self.report(gains)?.summary)
    }

    /// Tax summary plus a per-lot breakdown
    pub fn report(&self, gains: &[RealizedGain]) -> FundResult<TaxReport> {
        let lots = self.lot_details(gains)?;
        let summary = self.summarize(&lots)?;

        Ok(TaxReport {
            financial_year: None,
            summary,
            lots,
        })
    }

    /// Like [`report`](Self::report), keeping only redemptions whose sale
    /// date falls in `financial_year`. Every lot is validated, in the year
    /// or not.
    pub fn report_for_year(
        &self,
        gains: &[RealizedGain],
        financial_year: FinancialYear,
    ) -> FundResult<TaxReport> {
        let lots: Vec<LotTaxDetail> = self
            .lot_details(gains)?
            .into_iter()
            .filter(|lot| financial_year.contains(lot.sale_date))
            .collect();

        tracing::debug!(
            "FY {}: {} of {} redemptions in range",
            financial_year,
            lots.len(),
            gains.len()
        );

        let summary = self.summarize(&lots)?;

        Ok(TaxReport {
            financial_year: Some(financial_year),
            summary,
            lots,
        })
    }

    fn lot_details(&self, gains: &[RealizedGain]) -> FundResult<Vec<LotTaxDetail>> {
        gains.iter().map(|g| self.lot_detail(g)).collect()
    }

    fn lot_detail(&self, gain: &RealizedGain) -> FundResult<LotTaxDetail> {
        let classification = gain.classify(self.long_term_threshold_days)?;

        Ok(LotTaxDetail {
            scheme: gain.scheme.clone(),
            purchase_date: gain.purchase_date,
            sale_date: gain.sale_date,
            proceeds: gain.sale_proceeds,
            cost_basis: gain.cost_basis,
            gain: gain.gain()?,
            holding_days: classification.holding_days,
            holding_period: classification.period(),
        })
    }

    fn summarize(&self, lots: &[LotTaxDetail]) -> FundResult<TaxResult> {
        let (long_term, short_term): (Vec<&LotTaxDetail>, Vec<&LotTaxDetail>) = lots
            .iter()
            .partition(|lot| lot.holding_period == HoldingPeriod::LongTerm);

        let short_term_gain_total = match self.loss_netting {
            LossNetting::PerLot => checked_sum(
                short_term
                    .iter()
                    .map(|lot| lot.gain)
                    .filter(|gain| *gain > Decimal::ZERO),
            )?,
            LossNetting::NetThenFloor => checked_sum(short_term.iter().map(|lot| lot.gain))?,
        };
        let long_term_gain_total = checked_sum(long_term.iter().map(|lot| lot.gain))?;

        let exemption = self.rates.long_term_exemption_amount;
        let long_term_exemption_used = long_term_gain_total.max(Decimal::ZERO).min(exemption);
        let taxable_long_term_gain = long_term_gain_total
            .checked_sub(exemption)
            .ok_or_else(|| FundError::overflow("long-term gain minus exemption"))?
            .max(Decimal::ZERO);

        let short_term_tax = round_to_minor_unit(percent_of(
            short_term_gain_total.max(Decimal::ZERO),
            self.rates.short_term_rate,
        )?);
        let long_term_tax = round_to_minor_unit(percent_of(
            taxable_long_term_gain,
            self.rates.long_term_rate,
        )?);

        let result = TaxResult {
            short_term_gain_total: round_to_minor_unit(short_term_gain_total),
            long_term_gain_total: round_to_minor_unit(long_term_gain_total),
            long_term_exemption_used: round_to_minor_unit(long_term_exemption_used),
            taxable_long_term_gain: round_to_minor_unit(taxable_long_term_gain),
            short_term_tax,
            long_term_tax,
            total_tax: short_term_tax + long_term_tax,
        };

        tracing::debug!(
            "Capital gains over {} lots ({} short-term, {} long-term): total tax {}",
            lots.len(),
            short_term.len(),
            long_term.len(),
            result.total_tax
        );

        Ok(result)
    }
}

/// Tax owed on `gains` under `rates`, with the 365-day threshold and
/// per-lot loss flooring
pub fn compute_capital_gains_tax(gains: &[RealizedGain], rates: TaxRates) -> FundResult<TaxResult> {
    TaxCalculator::new(rates)?.compute(gains)
}
