//! Service status ordinals and their severity buckets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal severity reported by the backend (0 = OK .. 5 = Disaster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceStatus(u8);

impl ServiceStatus {
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub fn code(&self) -> u8 {
        self.0
    }

    /// Severity bucket: 0-1 healthy, 2-3 degraded, 4 and above critical.
    pub fn bucket(&self) -> StatusBucket {
        match self.0 {
            0 | 1 => StatusBucket::Healthy,
            2 | 3 => StatusBucket::Degraded,
            _ => StatusBucket::Critical,
        }
    }

    /// Display label of the status.
    pub fn label(&self) -> &'static str {
        match self.0 {
            0 | 1 => "OK",
            2 => "Warning",
            3 => "Average",
            4 => "High",
            5 => "Disaster",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse severity used to color a status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    Healthy,
    Degraded,
    Critical,
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let buckets: Vec<_> = (0..=5).map(|c| ServiceStatus::new(c).bucket()).collect();
        assert_eq!(
            buckets,
            vec![
                StatusBucket::Healthy,
                StatusBucket::Healthy,
                StatusBucket::Degraded,
                StatusBucket::Degraded,
                StatusBucket::Critical,
                StatusBucket::Critical,
            ]
        );
    }

    #[test]
    fn test_out_of_range_is_critical() {
        assert_eq!(ServiceStatus::new(9).bucket(), StatusBucket::Critical);
        assert_eq!(ServiceStatus::new(9).label(), "Unknown");
    }

    #[test]
    fn test_labels() {
        assert_eq!(ServiceStatus::new(1).label(), "OK");
        assert_eq!(ServiceStatus::new(3).label(), "Average");
        assert_eq!(ServiceStatus::new(5).to_string(), "Disaster");
    }
}
