//! Financial Year
//!
//! Capital-gains statements are reported per financial year, which runs from
//! April 1 to March 31 and is labelled by both calendar years ("2023-24").

use chrono::{Datelike, NaiveDate};
use fund_core::{FundError, FundResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear {
    start_year: i32,
}

impl FinancialYear {
    /// Financial year starting on April 1 of `start_year`
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The financial year a date falls in
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }

    /// Parse "2023-24" or "2023-2024".
    pub fn parse(label: &str) -> FundResult<Self> {
        let invalid = || {
            FundError::config(format!(
                "invalid financial year '{}', expected e.g. 2023-24",
                label
            ))
        };

        let (start, end) = label.trim().split_once('-').ok_or_else(invalid)?;
        if start.len() != 4 {
            return Err(invalid());
        }
        let start_year: i32 = start.parse().map_err(|_| invalid())?;
        let end_year: i32 = end.parse().map_err(|_| invalid())?;

        let matches = match end.len() {
            2 => end_year == (start_year + 1) % 100,
            4 => end_year == start_year + 1,
            _ => false,
        };
        if !matches {
            return Err(invalid());
        }

        Ok(Self::new(start_year))
    }
}

impl std::fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.start_year, (self.start_year + 1) % 100)
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = FundError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FinancialYear> for String {
    fn from(value: FinancialYear) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_containing_splits_on_april_first() {
        assert_eq!(FinancialYear::containing(date("2024-03-31")), FinancialYear::new(2023));
        assert_eq!(FinancialYear::containing(date("2024-04-01")), FinancialYear::new(2024));
        assert_eq!(FinancialYear::containing(date("2024-01-15")), FinancialYear::new(2023));
    }

    #[test]
    fn test_label_round_trip() {
        let fy = FinancialYear::parse("2023-24").unwrap();
        assert_eq!(fy.start_year(), 2023);
        assert_eq!(fy.to_string(), "2023-24");
        assert_eq!(FinancialYear::parse("2099-2100").unwrap().to_string(), "2099-00");
    }

    #[test]
    fn test_parse_rejects_mismatched_years() {
        assert!(FinancialYear::parse("2023-25").is_err());
        assert!(FinancialYear::parse("2023").is_err());
        assert!(FinancialYear::parse("23-24").is_err());
        assert!(FinancialYear::parse("abcd-ef").is_err());
    }

    #[test]
    fn test_serde_uses_label() {
        let fy: FinancialYear = serde_json::from_str("\"2022-23\"").unwrap();
        assert_eq!(fy, FinancialYear::new(2022));
        assert_eq!(serde_json::to_string(&fy).unwrap(), "\"2022-23\"");
        assert!(serde_json::from_str::<FinancialYear>("\"2022\"").is_err());
    }

    #[test]
    fn test_contains() {
        let fy = FinancialYear::new(2023);
        assert!(fy.contains(date("2023-04-01")));
        assert!(fy.contains(date("2024-03-31")));
        assert!(!fy.contains(date("2024-04-01")));
    }
}
