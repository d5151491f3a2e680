//! Tax Calculator
//!
//! Capital-gains tax on mutual-fund redemptions: holding-period
//! classification (STCG/LTCG), exemption handling and financial-year reports.

pub mod financial_year;
pub mod holding_period;
pub mod tax_calculator;


pub use financial_year::FinancialYear;
pub use holding_period::{
    classify_holding, classify_holding_default, days_until_long_term, HoldingClassification,
    HoldingPeriod, DEFAULT_LONG_TERM_THRESHOLD_DAYS,
};
pub use tax_calculator::{
    compute_capital_gains_tax, LossNetting, LotTaxDetail, RealizedGain, TaxCalculator, TaxRates,
    TaxReport, TaxResult,
};
