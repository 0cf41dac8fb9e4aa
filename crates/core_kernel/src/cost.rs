//! Reported out-of-pocket costs
//!
//! Costs are US dollar amounts reported by respondents (parking, fares,
//! residence parking). They are kept as `Decimal` rounded to cents, and a
//! cost can never be negative.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    #[error("Cost cannot be negative: {0}")]
    Negative(Decimal),

    #[error("Invalid cost amount: {0}")]
    InvalidAmount(String),
}

/// A non-negative dollar amount with two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Cost(Decimal);

impl Cost {
    /// Creates a cost, rounding half-even to cents
    pub fn new(amount: Decimal) -> Result<Self, CostError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CostError::Negative(amount));
        }
        Ok(Self(
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        ))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Converts a reported floating point amount
    pub fn from_f64(amount: f64) -> Result<Self, CostError> {
        let decimal = Decimal::try_from(amount)
            .map_err(|_| CostError::InvalidAmount(amount.to_string()))?;
        Self::new(decimal)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Cost {
    type Error = CostError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Cost::new(value)
    }
}

impl From<Cost> for Decimal {
    fn from(cost: Cost) -> Decimal {
        cost.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cost_rounds_to_cents() {
        let cost = Cost::new(dec!(12.345)).unwrap();
        assert_eq!(cost.amount(), dec!(12.34));
        assert_eq!(cost.to_string(), "$12.34");
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert!(matches!(Cost::new(dec!(-1)), Err(CostError::Negative(_))));
    }

    #[test]
    fn test_serde_rejects_negative() {
        assert!(serde_json::from_str::<Cost>("\"-5.00\"").is_err());
        let cost: Cost = serde_json::from_str("\"5.50\"").unwrap();
        assert_eq!(cost.amount(), dec!(5.50));
    }
}
