//! SIP API Routes

use axum::{routing::post, Json, Router};
use serde::Serialize;
use sip_planner::{growth_schedule, project_sip, SipPlan, SipProjection, YearlyGrowth};

use crate::{ApiResponse, AppError, AppState};

#[derive(Serialize)]
pub struct SipProjectionResponse {
    pub plan: SipPlan,
    pub projection: SipProjection,
    pub schedule: Vec<YearlyGrowth>,
}

pub fn sip_routes() -> Router<AppState> {
    Router::new().route("/api/sip/projection", post(project))
}

async fn project(
    Json(plan): Json<SipPlan>,
) -> Result<Json<ApiResponse<SipProjectionResponse>>, AppError> {
    let projection = project_sip(&plan)?;
    let schedule = growth_schedule(&plan)?;

    Ok(Json(ApiResponse::success(SipProjectionResponse {
        plan,
        projection,
        schedule,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn router() -> Router {
        sip_routes().with_state(test_state())
    }

    #[tokio::test]
    async fn test_monthly_projection() {
        let (status, json) = post_json(
            router(),
            "/api/sip/projection",
            json!({
                "periodic_amount": 5000,
                "annual_return_percent": 12,
                "frequency": "Monthly",
                "duration_months": 60
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let projection = &json["data"]["projection"];
        assert_eq!(decimal(&projection["total_invested"]), dec!(300000));
        assert_eq!(decimal(&projection["future_value"]), dec!(412431.83));
        assert_eq!(decimal(&projection["estimated_returns"]), dec!(112431.83));
        assert_eq!(json["data"]["schedule"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_quarterly_duration_must_divide() {
        let (status, json) = post_json(
            router(),
            "/api/sip/projection",
            json!({
                "periodic_amount": 5000,
                "annual_return_percent": 12,
                "frequency": "Quarterly",
                "duration_months": 10
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Configuration error"));
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let (status, _) = post_json(
            router(),
            "/api/sip/projection",
            json!({
                "periodic_amount": 0,
                "annual_return_percent": 12,
                "frequency": "Monthly",
                "duration_months": 12
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
