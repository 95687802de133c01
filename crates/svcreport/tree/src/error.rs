//! Error types for svcreport-tree.
//!
//! Every variant names the service (or lookup) that failed.

use std::fmt;

use svcreport_types::{AvailabilityWindow, ServiceId};
use thiserror::Error;

use crate::backend::BackendError;

/// Which backend call was running when resolution failed.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPhase {
    /// Looking up service records.
    Lookup,
    /// Availability over one window.
    Availability(AvailabilityWindow),
    /// Currently active problem ids.
    ActiveProblems,
    /// Descriptions of active problems.
    ProblemDescriptions,
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup => write!(f, "service lookup"),
            Self::Availability(window) => write!(f, "{} availability", window),
            Self::ActiveProblems => write!(f, "active problems"),
            Self::ProblemDescriptions => write!(f, "problem descriptions"),
        }
    }
}

/// Errors that abort a tree resolution.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A backend call failed.
    #[error("failed to query the {phase} of service {service}: {source}")]
    BackendQuery {
        service: String,
        phase: QueryPhase,
        #[source]
        source: BackendError,
    },

    /// Not every requested root service exists in the backend.
    #[error(
        "backend returned {returned} of {requested} requested services, missing: {}",
        .missing.join(", ")
    )]
    IncompleteResultSet {
        requested: usize,
        returned: usize,
        missing: Vec<String>,
    },

    /// A declared dependency has no record in the backend.
    #[error("dependency {dependency} of service {service} not found")]
    DependencyNotFound {
        service: String,
        dependency: ServiceId,
    },

    /// A dependency points back to a service already on the current path.
    #[error(
        "cyclic dependency: service {service} depends on {dependency}, already on path {}",
        .path.join(" -> ")
    )]
    CyclicDependency {
        service: String,
        dependency: ServiceId,
        path: Vec<String>,
    },
}

impl TreeError {
    pub(crate) fn query(service: &str, phase: QueryPhase, source: BackendError) -> Self {
        Self::BackendQuery {
            service: service.to_string(),
            phase,
            source,
        }
    }
}

/// Result type for tree resolution.
pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_query_names_service() {
        let err = TreeError::query(
            "DB",
            QueryPhase::Availability(AvailabilityWindow::Day),
            BackendError::Transport("connection reset".into()),
        );
        let message = err.to_string();
        assert!(message.contains("DB"));
        assert!(message.contains("1d availability"));
        assert!(message.contains("connection reset"));
    }

    #[test]
    fn test_incomplete_result_set_lists_missing() {
        let err = TreeError::IncompleteResultSet {
            requested: 3,
            returned: 1,
            missing: vec!["Mail".into(), "DNS".into()],
        };
        assert_eq!(
            err.to_string(),
            "backend returned 1 of 3 requested services, missing: Mail, DNS"
        );
    }

    #[test]
    fn test_cycle_message_shows_path() {
        let err = TreeError::CyclicDependency {
            service: "B".into(),
            dependency: ServiceId::new("1"),
            path: vec!["1".into(), "2".into()],
        };
        assert!(err.to_string().ends_with("1 -> 2"));
    }
}
