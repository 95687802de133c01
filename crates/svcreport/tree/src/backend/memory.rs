//! In-memory monitoring backend for development and testing.
//!
//! Holds service records, availability values and problems in memory, and
//! can be told to fail specific calls for specific services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;
use svcreport_types::{
    AvailabilityWindow, ProblemId, ServiceDescriptor, ServiceFilter, ServiceId, TimeWindow,
};

use super::{BackendError, BackendResult, MonitoringBackend};

/// Backend call that should fail for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Lookup,
    Availability,
    ActiveProblems,
    ProblemDescriptions,
}

/// In-memory monitoring backend.
pub struct InMemoryBackend {
    /// Service records indexed by ID.
    services: Arc<DashMap<ServiceId, ServiceDescriptor>>,

    /// Availability per service, indexed by window.
    availability: Arc<DashMap<(ServiceId, AvailabilityWindow), f64>>,

    /// Active problems per service.
    problems: Arc<DashMap<ServiceId, Vec<ProblemId>>>,

    /// Problem descriptions.
    descriptions: Arc<DashMap<ProblemId, String>>,

    /// Injected failures.
    failures: Arc<DashMap<(ServiceId, FailPoint), ()>>,

    /// Services whose availability queries never complete.
    stalled: Arc<DashMap<ServiceId, ()>>,

    /// Availability queries made per service.
    availability_queries: Arc<DashMap<ServiceId, usize>>,

    /// Total number of backend calls.
    calls: AtomicUsize,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            services: Arc::new(DashMap::new()),
            availability: Arc::new(DashMap::new()),
            problems: Arc::new(DashMap::new()),
            descriptions: Arc::new(DashMap::new()),
            failures: Arc::new(DashMap::new()),
            stalled: Arc::new(DashMap::new()),
            availability_queries: Arc::new(DashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Add or replace a service record.
    pub fn insert_service(&self, descriptor: ServiceDescriptor) {
        self.services.insert(descriptor.id.clone(), descriptor);
    }

    /// Set the availability of a service for one window.
    pub fn set_availability(&self, service_id: &ServiceId, window: AvailabilityWindow, value: f64) {
        self.availability.insert((service_id.clone(), window), value);
    }

    /// Set the same availability for every window.
    pub fn set_availability_all(&self, service_id: &ServiceId, value: f64) {
        for window in AvailabilityWindow::ALL {
            self.set_availability(service_id, window, value);
        }
    }

    /// Attach an active problem to a service.
    pub fn add_problem(
        &self,
        service_id: &ServiceId,
        problem_id: ProblemId,
        description: impl Into<String>,
    ) {
        self.descriptions
            .insert(problem_id.clone(), description.into());
        self.problems
            .entry(service_id.clone())
            .or_default()
            .push(problem_id);
    }

    /// Keep a problem active but drop its description, as for a trigger
    /// the API user cannot read.
    pub fn hide_description(&self, problem_id: &ProblemId) {
        self.descriptions.remove(problem_id);
    }

    /// Make a call fail whenever it concerns `service_id`.
    pub fn fail(&self, service_id: &ServiceId, point: FailPoint) {
        self.failures.insert((service_id.clone(), point), ());
    }

    /// Make availability queries for `service_id` hang forever.
    pub fn stall(&self, service_id: &ServiceId) {
        self.stalled.insert(service_id.clone(), ());
    }

    /// Number of availability queries made for a service.
    pub fn availability_queries(&self, service_id: &ServiceId) -> usize {
        self.availability_queries
            .get(service_id)
            .map(|count| *count)
            .unwrap_or(0)
    }

    /// Total number of backend calls made so far.
    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn check(&self, service_id: &ServiceId, point: FailPoint) -> BackendResult<()> {
        if self.failures.contains_key(&(service_id.clone(), point)) {
            Err(BackendError::Transport(format!(
                "simulated {:?} failure for service {}",
                point, service_id
            )))
        } else {
            Ok(())
        }
    }

    fn window_of(range: TimeWindow) -> AvailabilityWindow {
        let span = range.end - range.start;
        if span <= Duration::days(1) {
            AvailabilityWindow::Day
        } else if span <= Duration::weeks(1) {
            AvailabilityWindow::Week
        } else {
            AvailabilityWindow::Month
        }
    }

    /// Records sorted by name, the way the backend lists them.
    fn sorted(&self, mut found: Vec<ServiceDescriptor>) -> Vec<ServiceDescriptor> {
        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        found
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MonitoringBackend for InMemoryBackend {
    async fn get_services(&self, filter: &ServiceFilter) -> BackendResult<Vec<ServiceDescriptor>> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let found: Vec<ServiceDescriptor> = match filter {
            ServiceFilter::All => self.services.iter().map(|s| s.value().clone()).collect(),
            ServiceFilter::Names(names) => self
                .services
                .iter()
                .filter(|s| names.contains(&s.name))
                .map(|s| s.value().clone())
                .collect(),
            ServiceFilter::Ids(ids) => ids
                .iter()
                .filter_map(|id| self.services.get(id).map(|s| s.value().clone()))
                .collect(),
        };

        for service in &found {
            self.check(&service.id, FailPoint::Lookup)?;
        }
        if let ServiceFilter::Ids(ids) = filter {
            for id in ids {
                self.check(id, FailPoint::Lookup)?;
            }
        }

        Ok(self.sorted(found))
    }

    async fn get_availability(
        &self,
        service_id: &ServiceId,
        window: TimeWindow,
    ) -> BackendResult<f64> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self
            .availability_queries
            .entry(service_id.clone())
            .or_insert(0) += 1;
        self.check(service_id, FailPoint::Availability)?;
        if self.stalled.contains_key(service_id) {
            futures::future::pending::<()>().await;
        }

        // Services without recorded availability were never down
        Ok(self
            .availability
            .get(&(service_id.clone(), Self::window_of(window)))
            .map(|value| *value)
            .unwrap_or(100.0))
    }

    async fn get_active_problems(
        &self,
        service_ids: &[ServiceId],
        _window: TimeWindow,
    ) -> BackendResult<HashMap<ServiceId, Vec<ProblemId>>> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let mut active = HashMap::new();
        for id in service_ids {
            self.check(id, FailPoint::ActiveProblems)?;
            if let Some(problems) = self.problems.get(id) {
                active.insert(id.clone(), problems.clone());
            }
        }
        Ok(active)
    }

    async fn describe_problems(&self, problem_ids: &[ProblemId]) -> BackendResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        for entry in self.problems.iter() {
            if entry.value().iter().any(|p| problem_ids.contains(p)) {
                self.check(entry.key(), FailPoint::ProblemDescriptions)?;
            }
        }

        Ok(problem_ids
            .iter()
            .filter_map(|id| self.descriptions.get(id).map(|d| d.clone()))
            .collect())
    }
}
