//! Per-service metrics resolution.
//!
//! For one service the resolver issues three availability queries (day,
//! week and month windows ending at the run's "now"), one current-state
//! query for active problem ids over the last day, and, when anything is
//! firing, one query for the problem descriptions.

use std::sync::Arc;

use svcreport_types::{
    AvailabilityWindow, Percentage, ServiceDescriptor, ServiceNode, NO_ACTIVE_INCIDENTS,
};
use tracing::{debug, instrument};

use crate::backend::{BackendError, MonitoringBackend};
use crate::context::TreeResolutionContext;
use crate::error::{QueryPhase, TreeError, TreeResult};

/// Metrics of one service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceMetrics {
    pub incidents: Vec<String>,
    pub availability_1d: Percentage,
    pub availability_1w: Percentage,
    pub availability_1m: Percentage,
}

impl ServiceMetrics {
    /// Combine with the service record into a childless node.
    pub fn into_node(self, descriptor: &ServiceDescriptor, depth_level: u32) -> ServiceNode {
        ServiceNode {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            status: descriptor.status,
            incidents: self.incidents,
            availability_1d: self.availability_1d,
            availability_1w: self.availability_1w,
            availability_1m: self.availability_1m,
            sla_target: descriptor.sla_target,
            has_scheduled_times: descriptor.has_scheduled_times,
            depth_level,
            children: Vec::new(),
        }
    }
}

/// Resolves availability and incidents of single services.
#[derive(Clone)]
pub struct MetricsResolver {
    backend: Arc<dyn MonitoringBackend>,
}

impl MetricsResolver {
    pub fn new(backend: Arc<dyn MonitoringBackend>) -> Self {
        Self { backend }
    }

    /// Resolve all metrics of a service. Any failed query aborts the whole
    /// resolution; no partial metrics are returned.
    #[instrument(skip(self, descriptor, context), fields(service = %descriptor.name))]
    pub async fn resolve(
        &self,
        descriptor: &ServiceDescriptor,
        context: &TreeResolutionContext,
    ) -> TreeResult<ServiceMetrics> {
        let availability_1d = self
            .availability(descriptor, context, AvailabilityWindow::Day)
            .await?;
        let availability_1w = self
            .availability(descriptor, context, AvailabilityWindow::Week)
            .await?;
        let availability_1m = self
            .availability(descriptor, context, AvailabilityWindow::Month)
            .await?;
        let incidents = self.incidents(descriptor, context).await?;

        debug!(
            availability_1d = %availability_1d,
            incidents = incidents.len(),
            "Resolved service metrics"
        );

        Ok(ServiceMetrics {
            incidents,
            availability_1d,
            availability_1w,
            availability_1m,
        })
    }

    async fn availability(
        &self,
        descriptor: &ServiceDescriptor,
        context: &TreeResolutionContext,
        window: AvailabilityWindow,
    ) -> TreeResult<Percentage> {
        let phase = QueryPhase::Availability(window);
        let raw = self
            .backend
            .get_availability(&descriptor.id, context.windows.range(window))
            .await
            .map_err(|e| TreeError::query(&descriptor.name, phase.clone(), e))?;

        Percentage::new(raw).map_err(|e| {
            TreeError::query(
                &descriptor.name,
                phase,
                BackendError::Malformed(e.to_string()),
            )
        })
    }

    async fn incidents(
        &self,
        descriptor: &ServiceDescriptor,
        context: &TreeResolutionContext,
    ) -> TreeResult<Vec<String>> {
        let mut active = self
            .backend
            .get_active_problems(
                std::slice::from_ref(&descriptor.id),
                context.windows.current_state(),
            )
            .await
            .map_err(|e| TreeError::query(&descriptor.name, QueryPhase::ActiveProblems, e))?;

        let problem_ids = active.remove(&descriptor.id).unwrap_or_default();
        if problem_ids.is_empty() {
            return Ok(vec![NO_ACTIVE_INCIDENTS.to_string()]);
        }

        let descriptions = self
            .backend
            .describe_problems(&problem_ids)
            .await
            .map_err(|e| TreeError::query(&descriptor.name, QueryPhase::ProblemDescriptions, e))?;

        if descriptions.is_empty() {
            Ok(vec![NO_ACTIVE_INCIDENTS.to_string()])
        } else {
            Ok(descriptions)
        }
    }
}
