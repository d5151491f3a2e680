use serde::{Deserialize, Serialize};

use crate::quiet_hours::{QuietHoursWindow, TimeOfDay};
use crate::{Alert, AlertCategory, AlertPriority};

/// Delivery channels the investor can switch on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Push,
    Sms,
}

/// Per-investor notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default = "default_true")]
    pub push: bool,
    #[serde(default)]
    pub sms: bool,
    #[serde(default)]
    pub muted_categories: Vec<AlertCategory>,
    #[serde(default)]
    pub quiet_hours: QuietHoursWindow,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
            muted_categories: Vec::new(),
            quiet_hours: QuietHoursWindow::default(),
        }
    }
}

impl NotificationPreferences {
    pub fn enabled_channels(&self) -> Vec<Channel> {
        [
            (Channel::Email, self.email),
            (Channel::Push, self.push),
            (Channel::Sms, self.sms),
        ]
        .into_iter()
        .filter_map(|(channel, on)| on.then_some(channel))
        .collect()
    }

    pub fn is_muted(&self, category: AlertCategory) -> bool {
        self.muted_categories.contains(&category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionReason {
    CategoryMuted(AlertCategory),
    NoChannels,
    QuietHours,
}

impl std::fmt::Display for SuppressionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuppressionReason::CategoryMuted(category) => write!(f, "{:?} alerts are muted", category),
            SuppressionReason::NoChannels => write!(f, "no delivery channel enabled"),
            SuppressionReason::QuietHours => write!(f, "quiet hours are active"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryDecision {
    Deliver { channels: Vec<Channel> },
    Suppressed { reason: SuppressionReason },
}

impl DeliveryDecision {
    pub fn is_deliver(&self) -> bool {
        matches!(self, DeliveryDecision::Deliver { .. })
    }
}

/// Decides whether an alert goes out now, given the investor's preferences.
pub struct AlertGate {
    preferences: NotificationPreferences,
}

impl AlertGate {
    pub fn new(preferences: NotificationPreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &NotificationPreferences {
        &self.preferences
    }

    /// Muted categories and missing channels suppress everything; quiet
    /// hours suppress all but critical alerts.
    pub fn evaluate(&self, alert: &Alert, now: TimeOfDay) -> DeliveryDecision {
        let decision = self.decide(alert, now);

        if let DeliveryDecision::Suppressed { reason } = &decision {
            tracing::debug!("Suppressed '{}' at {}: {}", alert.title, now, reason);
        }

        decision
    }

    fn decide(&self, alert: &Alert, now: TimeOfDay) -> DeliveryDecision {
        let category = alert.category();
        if self.preferences.is_muted(category) {
            return DeliveryDecision::Suppressed {
                reason: SuppressionReason::CategoryMuted(category),
            };
        }

        let channels = self.preferences.enabled_channels();
        if channels.is_empty() {
            return DeliveryDecision::Suppressed {
                reason: SuppressionReason::NoChannels,
            };
        }

        if alert.priority != AlertPriority::Critical && self.preferences.quiet_hours.is_active_at(now) {
            return DeliveryDecision::Suppressed {
                reason: SuppressionReason::QuietHours,
            };
        }

        DeliveryDecision::Deliver { channels }
    }
}
