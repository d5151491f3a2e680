//! Alert API Routes
//!
//! Quiet-hours checks and delivery decisions for platform alerts.

use axum::{extract::State, routing::post, Json, Router};
use chrono::Local;
use notification_service::{
    is_quiet_hours_active, Alert, AlertGate, AlertPriority, AlertType, DeliveryDecision,
    NotificationPreferences, QuietHoursWindow, TimeOfDay,
};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

/// `now` defaults to the server's local time, `window` to the configured one
#[derive(Deserialize)]
pub struct QuietHoursRequest {
    pub now: Option<TimeOfDay>,
    pub window: Option<QuietHoursWindow>,
}

#[derive(Serialize)]
pub struct QuietHoursResponse {
    pub active: bool,
    pub now: TimeOfDay,
    pub window: QuietHoursWindow,
}

#[derive(Deserialize)]
pub struct EvaluateAlertRequest {
    pub alert_type: AlertType,
    pub priority: Option<AlertPriority>,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub preferences: Option<NotificationPreferences>,
    pub now: Option<TimeOfDay>,
}

pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/api/alerts/quiet-hours", post(check_quiet_hours))
        .route("/api/alerts/evaluate", post(evaluate_alert))
}

fn local_time() -> TimeOfDay {
    TimeOfDay::from(Local::now().time())
}

async fn check_quiet_hours(
    State(state): State<AppState>,
    Json(req): Json<QuietHoursRequest>,
) -> Result<Json<ApiResponse<QuietHoursResponse>>, AppError> {
    let now = req.now.unwrap_or_else(local_time);
    let window = req.window.unwrap_or(state.config.quiet_hours);

    Ok(Json(ApiResponse::success(QuietHoursResponse {
        active: is_quiet_hours_active(now, &window),
        now,
        window,
    })))
}

async fn evaluate_alert(
    State(state): State<AppState>,
    Json(req): Json<EvaluateAlertRequest>,
) -> Result<Json<ApiResponse<DeliveryDecision>>, AppError> {
    let preferences = req.preferences.unwrap_or_else(|| NotificationPreferences {
        quiet_hours: state.config.quiet_hours,
        ..NotificationPreferences::default()
    });

    let mut alert = Alert::new(req.alert_type, req.title, req.message);
    if let Some(priority) = req.priority {
        alert = alert.with_priority(priority);
    }

    let now = req.now.unwrap_or_else(local_time);
    let decision = AlertGate::new(preferences).evaluate(&alert, now);

    Ok(Json(ApiResponse::success(decision)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::ServerConfig;
    use axum::http::StatusCode;
    use serde_json::json;

    fn router() -> Router {
        alert_routes().with_state(test_state())
    }

    #[tokio::test]
    async fn test_overnight_window() {
        for (now, expected) in [("23:30", true), ("06:00", true), ("12:00", false), ("07:00", false)] {
            let (status, json) = post_json(
                router(),
                "/api/alerts/quiet-hours",
                json!({
                    "now": now,
                    "window": {"enabled": true, "start": "22:00", "end": "07:00"}
                }),
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["data"]["active"], expected, "at {}", now);
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_configured_window() {
        let config = ServerConfig {
            quiet_hours: QuietHoursWindow::parse("21:00", "06:00").unwrap(),
            ..ServerConfig::default()
        };
        let router = alert_routes().with_state(AppState::new(config));

        let (_, json) = post_json(router, "/api/alerts/quiet-hours", json!({"now": "21:15"})).await;

        assert_eq!(json["data"]["active"], true);
        assert_eq!(json["data"]["window"]["start"], "21:00");
    }

    #[tokio::test]
    async fn test_disabled_window_inactive() {
        let (_, json) = post_json(
            router(),
            "/api/alerts/quiet-hours",
            json!({"now": "23:00", "window": {"enabled": false, "start": "22:00", "end": "07:00"}}),
        )
        .await;

        assert_eq!(json["data"]["active"], false);
    }

    #[tokio::test]
    async fn test_malformed_time_rejected() {
        let (status, _) = post_json(
            router(),
            "/api/alerts/quiet-hours",
            json!({"now": "7pm"}),
        )
        .await;

        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_evaluate_suppresses_during_quiet_hours() {
        let (status, json) = post_json(
            router(),
            "/api/alerts/evaluate",
            json!({
                "alert_type": {"TaxStatementReady": {"financial_year": "2023-24"}},
                "title": "Tax statement ready",
                "now": "23:00",
                "preferences": {
                    "quiet_hours": {"enabled": true, "start": "22:00", "end": "07:00"}
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["suppressed"]["reason"], "quiet_hours");
    }

    #[tokio::test]
    async fn test_evaluate_critical_delivers() {
        let (_, json) = post_json(
            router(),
            "/api/alerts/evaluate",
            json!({
                "alert_type": {"KycExpiring": {"days_remaining": 3}},
                "title": "KYC expiring",
                "now": "23:00",
                "preferences": {
                    "quiet_hours": {"enabled": true, "start": "22:00", "end": "07:00"}
                }
            }),
        )
        .await;

        let channels = json["data"]["deliver"]["channels"].as_array().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0], "email");
    }
}
