use anyhow::{Context, Result};
use notification_service::{QuietHoursWindow, TimeOfDay};
use rust_decimal::Decimal;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use tax_calculator::{TaxRates, DEFAULT_LONG_TERM_THRESHOLD_DAYS};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    // Defaults applied when a request leaves them out
    pub tax_rates: TaxRates,
    pub long_term_threshold_days: u32,
    pub quiet_hours: QuietHoursWindow,

    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            tax_rates: TaxRates::india_equity(),
            long_term_threshold_days: DEFAULT_LONG_TERM_THRESHOLD_DAYS,
            quiet_hours: QuietHoursWindow::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let tax_rates = TaxRates {
            short_term_rate: parse(&get("TAX_SHORT_TERM_RATE", "15"), "TAX_SHORT_TERM_RATE")?,
            long_term_rate: parse(&get("TAX_LONG_TERM_RATE", "10"), "TAX_LONG_TERM_RATE")?,
            long_term_exemption_amount: parse::<Decimal>(
                &get("TAX_LONG_TERM_EXEMPTION", "100000"),
                "TAX_LONG_TERM_EXEMPTION",
            )?,
        };
        tax_rates.validate().context("Invalid tax configuration")?;

        let quiet_hours = QuietHoursWindow {
            enabled: parse(&get("QUIET_HOURS_ENABLED", "false"), "QUIET_HOURS_ENABLED")?,
            start: TimeOfDay::parse(&get("QUIET_HOURS_START", "22:00"))
                .context("Invalid QUIET_HOURS_START")?,
            end: TimeOfDay::parse(&get("QUIET_HOURS_END", "07:00"))
                .context("Invalid QUIET_HOURS_END")?,
        };

        let config = Self {
            host: get("API_HOST", "0.0.0.0"),
            port: parse(&get("API_PORT", "3000"), "API_PORT")?,
            tax_rates,
            long_term_threshold_days: parse(
                &get("LONG_TERM_THRESHOLD_DAYS", "365"),
                "LONG_TERM_THRESHOLD_DAYS",
            )?,
            quiet_hours,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS", "")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse<T>(value: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{} has an invalid value '{}'", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.tax_rates, TaxRates::india_equity());
        assert_eq!(config.long_term_threshold_days, 365);
        assert!(!config.quiet_hours.enabled);
        assert_eq!(config.quiet_hours.start.to_string(), "22:00");
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("API_PORT", "8080"),
            ("TAX_SHORT_TERM_RATE", "20"),
            ("TAX_LONG_TERM_RATE", "12.5"),
            ("TAX_LONG_TERM_EXEMPTION", "125000"),
            ("QUIET_HOURS_ENABLED", "true"),
            ("QUIET_HOURS_START", "23:00"),
            ("QUIET_HOURS_END", "06:30"),
            ("CORS_ALLOWED_ORIGINS", "https://app.example.com, http://localhost:5173"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.tax_rates, TaxRates::india_equity_2024());
        assert_eq!(config.tax_rates.long_term_rate, dec!(12.5));
        assert!(config.quiet_hours.enabled);
        assert_eq!(config.quiet_hours.end.to_string(), "06:30");
        assert_eq!(config.cors_allowed_origins.len(), 2);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("API_PORT", "  ")])).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("API_PORT", "http")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("TAX_SHORT_TERM_RATE", "-3")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("TAX_LONG_TERM_RATE", "150")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("QUIET_HOURS_START", "10pm")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("QUIET_HOURS_ENABLED", "sometimes")])).is_err());
    }
}
