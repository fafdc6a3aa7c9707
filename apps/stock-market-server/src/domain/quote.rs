//! Price quotes and client-submitted price updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::error::{ErrorDetail, ServiceError};

/// Shortest accepted stock symbol, in characters.
pub const MIN_SYMBOL_LEN: usize = 4;

/// Longest accepted stock symbol, in characters.
pub const MAX_SYMBOL_LEN: usize = 5;

/// A single price lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    /// Stock symbol, as requested.
    pub symbol: String,
    /// Price with two fractional digits.
    pub price: Decimal,
    /// Unix timestamp (seconds) of the lookup.
    pub timestamp: i64,
}

impl PriceQuote {
    /// Create a quote stamped at `at`.
    #[must_use]
    pub fn new(symbol: impl Into<String>, price: Decimal, at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp: at.timestamp(),
        }
    }

    /// Price as a wire `double`.
    #[must_use]
    pub fn price_f64(&self) -> f64 {
        self.price.to_f64().unwrap_or_default()
    }
}

/// A client-submitted price update, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    /// Stock symbol.
    pub symbol: String,
    /// Submitted price.
    pub price: f64,
}

/// A validated price update, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedUpdate {
    /// Stock symbol.
    pub symbol: String,
    /// Accepted price.
    pub price: Decimal,
}

impl PriceUpdate {
    /// Create an update.
    #[must_use]
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }

    /// Validate the update, collecting every violation in one pass.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` ("Invalid Request!") with one field
    /// violation per broken rule.
    pub fn validate(&self) -> Result<AcceptedUpdate, ServiceError> {
        let mut violations = Vec::new();

        let price = if !self.price.is_finite() {
            violations.push(ErrorDetail::field(
                "price",
                "The stock price must be a finite number.",
            ));
            None
        } else if self.price < 0.0 {
            violations.push(ErrorDetail::field(
                "price",
                "The stock price cannot be less than zero.",
            ));
            None
        } else if let Ok(price) = Decimal::try_from(self.price) {
            Some(price.normalize())
        } else {
            violations.push(ErrorDetail::field(
                "price",
                "The stock price is out of range.",
            ));
            None
        };

        let symbol_len = self.symbol.chars().count();
        if !(MIN_SYMBOL_LEN..=MAX_SYMBOL_LEN).contains(&symbol_len) {
            violations.push(ErrorDetail::field(
                "symbol",
                "The stock code must have 4 or 5 characters.",
            ));
        }

        match price {
            Some(price) if violations.is_empty() => Ok(AcceptedUpdate {
                symbol: self.symbol.clone(),
                price,
            }),
            _ => Err(ServiceError::invalid_argument("Invalid Request!", violations)),
        }
    }
}

impl AcceptedUpdate {
    /// Serialize as one line of the append log (no trailing newline).
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_log_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
