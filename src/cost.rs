// Rental total for a confirmed interval

use crate::date::Interval;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    #[error("Invalid daily rate: {0}")]
    InvalidRate(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Cost {
    pub amount: f64,
    pub days: i64,
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.amount)
    }
}

pub fn validate_rate(daily_rate: f64) -> Result<f64, CostError> {
    if !daily_rate.is_finite() || daily_rate < 0.0 {
        return Err(CostError::InvalidRate(daily_rate));
    }
    Ok(daily_rate)
}

/// Inclusive day count times the daily rate. A zero rate is a free listing, not an error.
pub fn cost(interval: &Interval, daily_rate: f64) -> Result<Cost, CostError> {
    let rate = validate_rate(daily_rate)?;
    let days = interval.day_count();
    Ok(Cost {
        amount: days as f64 * rate,
        days,
    })
}
