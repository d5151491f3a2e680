mod preferences;
mod quiet_hours;

pub use preferences::{AlertGate, Channel, DeliveryDecision, NotificationPreferences, SuppressionReason};
pub use quiet_hours::{is_quiet_hours_active, QuietHoursWindow, TimeOfDay};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Days before KYC expiry at which the reminder becomes critical.
const KYC_CRITICAL_DAYS: i64 = 7;

/// Alert types raised by the fund platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    SipDue {
        scheme: String,
        amount: Decimal,
        due_date: NaiveDate,
    },
    SipFailed {
        scheme: String,
        amount: Decimal,
        reason: String,
    },
    NavThresholdCrossed {
        scheme: String,
        nav: Decimal,
        threshold: Decimal,
    },
    TaxStatementReady {
        financial_year: String,
    },
    KycExpiring {
        days_remaining: i64,
    },
}

impl AlertType {
    pub fn category(&self) -> AlertCategory {
        match self {
            AlertType::SipDue { .. } | AlertType::SipFailed { .. } => AlertCategory::Sip,
            AlertType::NavThresholdCrossed { .. } => AlertCategory::Nav,
            AlertType::TaxStatementReady { .. } => AlertCategory::Tax,
            AlertType::KycExpiring { .. } => AlertCategory::Compliance,
        }
    }

    /// Failed debits and imminent KYC expiry need action now.
    pub fn default_priority(&self) -> AlertPriority {
        match self {
            AlertType::SipFailed { .. } => AlertPriority::Critical,
            AlertType::KycExpiring { days_remaining } if *days_remaining <= KYC_CRITICAL_DAYS => {
                AlertPriority::Critical
            }
            _ => AlertPriority::Normal,
        }
    }
}

/// Groups the investor can mute independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Sip,
    Nav,
    Tax,
    Compliance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    #[default]
    Normal,
    /// Delivered even during quiet hours
    Critical,
}

/// A notification alert to be dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(
        alert_type: AlertType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            priority: alert_type.default_priority(),
            alert_type,
            timestamp: chrono::Utc::now(),
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn with_priority(mut self, priority: AlertPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(&self) -> AlertCategory {
        self.alert_type.category()
    }
}
