//! Availability and SLA percentages.
//!
//! Every percentage in the report is fixed to two decimals when it is
//! created, and threshold checks run on that rounded value so that what is
//! compared is exactly what is displayed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TypesError, TypesResult};

/// A percentage rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Percentage(f64);

impl Percentage {
    /// Round `value` to two decimals. The rounded value must lie in
    /// `0.0..=100.0`.
    pub fn new(value: f64) -> TypesResult<Self> {
        if !value.is_finite() {
            return Err(TypesError::InvalidPercentage(value.to_string()));
        }
        let rounded = (value * 100.0).round() / 100.0;
        if !(0.0..=100.0).contains(&rounded) {
            return Err(TypesError::InvalidPercentage(value.to_string()));
        }
        // Adding zero turns -0.0 into 0.0
        Ok(Self(rounded + 0.0))
    }

    /// Parse a decimal string as returned by the backend (e.g. `"99.9500"`).
    pub fn parse(raw: &str) -> TypesResult<Self> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| TypesError::InvalidPercentage(raw.to_string()))?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Classify against an SLA target. Only a value strictly above the
    /// target is healthy.
    pub fn classify(&self, target: Percentage) -> AvailabilityClass {
        if self.0 > target.0 {
            AvailabilityClass::Healthy
        } else {
            AvailabilityClass::Breached
        }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Percentage> for f64 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl TryFrom<f64> for Percentage {
    type Error = TypesError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Outcome of comparing an availability value with its SLA target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityClass {
    Healthy,
    Breached,
}
