//! Monitoring backend contract.
//!
//! The resolver only needs four semantic calls from a backend: service
//! lookup, availability over a window, active problem ids, and problem
//! descriptions. Session handling happens before a backend is handed over.

pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use svcreport_types::{ProblemId, ServiceDescriptor, ServiceFilter, ServiceId, TimeWindow};
use thiserror::Error;

/// Errors reported by a monitoring backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with an error object.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The call needs a session that has not been established.
    #[error("not authenticated")]
    Unauthenticated,
}

/// Result type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Semantic calls the tree resolver makes against a monitoring backend.
#[async_trait]
pub trait MonitoringBackend: Send + Sync {
    /// Look up service records, each carrying its declared dependencies.
    async fn get_services(&self, filter: &ServiceFilter) -> BackendResult<Vec<ServiceDescriptor>>;

    /// Availability percentage of a service over a window.
    async fn get_availability(&self, service_id: &ServiceId, window: TimeWindow)
        -> BackendResult<f64>;

    /// Active problem ids of each service over a window. Services without
    /// problems may be absent from the map.
    async fn get_active_problems(
        &self,
        service_ids: &[ServiceId],
        window: TimeWindow,
    ) -> BackendResult<HashMap<ServiceId, Vec<ProblemId>>>;

    /// Human-readable descriptions of problems, in request order.
    async fn describe_problems(&self, problem_ids: &[ProblemId]) -> BackendResult<Vec<String>>;
}
