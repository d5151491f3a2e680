use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundError {
    #[error("Invalid date range: sale date {sale_date} precedes purchase date {purchase_date}")]
    InvalidDateRange {
        purchase_date: NaiveDate,
        sale_date: NaiveDate,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Calculation overflow: {0}")]
    Overflow(String),
}

impl FundError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::Overflow(message.into())
    }
}

pub type FundResult<T> = Result<T, FundError>;
