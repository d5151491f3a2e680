//! Capital Gains API Routes
//!
//! Holding-period classification and STCG/LTCG tax computation.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tax_calculator::{
    classify_holding, FinancialYear, HoldingClassification, HoldingPeriod, LossNetting,
    RealizedGain, TaxCalculator, TaxRates, TaxReport,
};

use crate::{ApiResponse, AppError, AppState};

/// Request to classify a single holding
#[derive(Deserialize)]
pub struct HoldingPeriodRequest {
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub threshold_days: Option<u32>,
}

#[derive(Serialize)]
pub struct HoldingPeriodResponse {
    #[serde(flatten)]
    pub classification: HoldingClassification,
    pub holding_period: HoldingPeriod,
    pub threshold_days: u32,
}

/// Request to compute tax on a set of redemptions; omitted settings fall
/// back to the server configuration
#[derive(Deserialize)]
pub struct CapitalGainsRequest {
    pub gains: Vec<RealizedGain>,
    pub rates: Option<TaxRates>,
    pub threshold_days: Option<u32>,
    pub loss_netting: Option<LossNetting>,
    pub financial_year: Option<FinancialYear>,
}

#[derive(Serialize)]
pub struct TaxRatesResponse {
    pub configured: TaxRates,
    pub long_term_threshold_days: u32,
    pub presets: Vec<TaxRatePreset>,
}

#[derive(Serialize)]
pub struct TaxRatePreset {
    pub code: String,
    pub name: String,
    pub rates: TaxRates,
}

pub fn tax_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tax/rates", get(get_tax_rates))
        .route("/api/tax/holding-period", post(classify_holding_period))
        .route("/api/tax/capital-gains", post(compute_capital_gains))
}

/// Configured defaults and the built-in presets
async fn get_tax_rates(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TaxRatesResponse>>, AppError> {
    let presets = vec![
        TaxRatePreset {
            code: "IN_EQUITY".to_string(),
            name: "Equity funds (until July 2024)".to_string(),
            rates: TaxRates::india_equity(),
        },
        TaxRatePreset {
            code: "IN_EQUITY_2024".to_string(),
            name: "Equity funds (from July 2024)".to_string(),
            rates: TaxRates::india_equity_2024(),
        },
    ];

    Ok(Json(ApiResponse::success(TaxRatesResponse {
        configured: state.config.tax_rates,
        long_term_threshold_days: state.config.long_term_threshold_days,
        presets,
    })))
}

async fn classify_holding_period(
    State(state): State<AppState>,
    Json(req): Json<HoldingPeriodRequest>,
) -> Result<Json<ApiResponse<HoldingPeriodResponse>>, AppError> {
    let threshold_days = req
        .threshold_days
        .unwrap_or(state.config.long_term_threshold_days);
    let classification = classify_holding(req.purchase_date, req.sale_date, threshold_days)?;

    Ok(Json(ApiResponse::success(HoldingPeriodResponse {
        holding_period: classification.period(),
        classification,
        threshold_days,
    })))
}

async fn compute_capital_gains(
    State(state): State<AppState>,
    Json(req): Json<CapitalGainsRequest>,
) -> Result<Json<ApiResponse<TaxReport>>, AppError> {
    let calculator = TaxCalculator::new(req.rates.unwrap_or(state.config.tax_rates))?
        .with_threshold(
            req.threshold_days
                .unwrap_or(state.config.long_term_threshold_days),
        )
        .with_loss_netting(req.loss_netting.unwrap_or_default());

    let report = match req.financial_year {
        Some(fy) => calculator.report_for_year(&req.gains, fy)?,
        None => calculator.report(&req.gains)?,
    };

    tracing::info!(
        "Computed capital gains for {} lots: total tax {}",
        report.lots.len(),
        report.summary.total_tax
    );

    Ok(Json(ApiResponse::success(report)))
}
