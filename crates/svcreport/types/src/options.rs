//! Options of a report run, already resolved from flags and config.

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// How sibling subtrees are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// One backend call at a time, siblings in declared order.
    #[default]
    Sequential,
    /// Sibling subtrees in parallel; the first failure cancels the rest.
    Concurrent,
}

/// What a report run should contain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Root service names; empty means every service.
    #[serde(default)]
    pub services: Vec<String>,

    /// Depth ceiling; `None` is unbounded.
    #[serde(default)]
    pub max_depth: Option<i32>,

    /// Keep only dependencies that have dependencies of their own.
    #[serde(default)]
    pub parents_only: bool,

    /// Add the "configured service times" column.
    #[serde(default)]
    pub show_service_times: bool,

    #[serde(default)]
    pub traversal: TraversalMode,
}

impl ReportOptions {
    /// Reject option combinations that can never produce what was asked.
    pub fn validate(&self) -> TypesResult<()> {
        if let Some(depth) = self.max_depth {
            if depth <= 0 && self.parents_only {
                return Err(TypesError::Configuration(format!(
                    "--parents-only filters dependencies, but a depth of {} never visits any",
                    depth
                )));
            }
        }

        if self.services.iter().any(|name| name.trim().is_empty()) {
            return Err(TypesError::Configuration(
                "service names must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = ReportOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.traversal, TraversalMode::Sequential);
        assert!(options.max_depth.is_none());
    }

    #[test]
    fn test_non_positive_depth_with_parents_only_is_rejected() {
        let options = ReportOptions {
            max_depth: Some(0),
            parents_only: true,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(TypesError::Configuration(_))));
    }

    #[test]
    fn test_non_positive_depth_alone_is_allowed() {
        let options = ReportOptions {
            max_depth: Some(-3),
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_blank_service_name_is_rejected() {
        let options = ReportOptions {
            services: vec!["Web".into(), " ".into()],
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
