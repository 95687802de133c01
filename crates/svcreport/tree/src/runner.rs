//! Top-level report run: root lookup followed by a forest build.

use std::collections::HashSet;
use std::sync::Arc;

use svcreport_types::{ReportOptions, ReportWindows, ServiceDescriptor, ServiceFilter};
use tracing::{info, instrument, warn};

use crate::backend::MonitoringBackend;
use crate::builder::{ResolvedForest, TreeBuilder};
use crate::context::TreeResolutionContext;
use crate::error::{QueryPhase, TreeError, TreeResult};

/// Runs complete report resolutions against one backend.
pub struct ReportRunner {
    backend: Arc<dyn MonitoringBackend>,
}

impl ReportRunner {
    pub fn new(backend: Arc<dyn MonitoringBackend>) -> Self {
        Self { backend }
    }

    /// Resolve the report with windows ending now.
    pub async fn run(&self, options: &ReportOptions) -> TreeResult<ResolvedForest> {
        self.run_at(options, ReportWindows::now()).await
    }

    /// Resolve the report with the given fixed windows.
    #[instrument(skip(self, options, windows), fields(services = options.services.len()))]
    pub async fn run_at(
        &self,
        options: &ReportOptions,
        windows: ReportWindows,
    ) -> TreeResult<ResolvedForest> {
        let roots = self.lookup_roots(&options.services).await?;
        let context = TreeResolutionContext::from_options(options, windows);
        TreeBuilder::new(self.backend.clone(), context)
            .build_forest(roots)
            .await
    }

    /// Look up the root services. Fails before any traversal when a named
    /// service is missing.
    pub async fn lookup_roots(&self, names: &[String]) -> TreeResult<Vec<ServiceDescriptor>> {
        let filter = ServiceFilter::by_names(names);
        let roots = self.backend.get_services(&filter).await.map_err(|e| {
            let service = if names.is_empty() {
                "<all services>".to_string()
            } else {
                names.join(", ")
            };
            TreeError::query(&service, QueryPhase::Lookup, e)
        })?;

        if !names.is_empty() {
            let returned: HashSet<&str> = roots.iter().map(|s| s.name.as_str()).collect();
            let mut missing: Vec<String> = Vec::new();
            for name in names {
                if !returned.contains(name.as_str()) && !missing.contains(name) {
                    missing.push(name.clone());
                }
            }

            if !missing.is_empty() {
                warn!(missing = ?missing, "Requested services not found");
                return Err(TreeError::IncompleteResultSet {
                    requested: names.len(),
                    returned: roots.len(),
                    missing,
                });
            }
        }

        info!(roots = roots.len(), "Looked up root services");
        Ok(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{FailPoint, InMemoryBackend};
    use svcreport_types::{Percentage, ServiceId, ServiceStatus};

    fn descriptor(id: &str, name: &str) -> ServiceDescriptor {
        ServiceDescriptor {
            id: ServiceId::new(id),
            name: name.to_string(),
            status: ServiceStatus::new(0),
            sla_target: Percentage::new(99.0).unwrap(),
            has_scheduled_times: false,
            dependencies: Vec::new(),
        }
    }

    fn backend() -> Arc<InMemoryBackend> {
        let backend = Arc::new(InMemoryBackend::new());
        backend.insert_service(descriptor("1", "Web"));
        backend.insert_service(descriptor("2", "DB"));
        backend
    }

    #[tokio::test]
    async fn test_empty_names_means_all() {
        let runner = ReportRunner::new(backend());
        let roots = runner.lookup_roots(&[]).await.unwrap();
        assert_eq!(roots.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_service_is_incomplete() {
        let backend = backend();
        let runner = ReportRunner::new(backend.clone());

        let err = runner
            .run(&ReportOptions {
                services: vec!["Web".into(), "Mail".into()],
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            TreeError::IncompleteResultSet {
                requested,
                returned,
                missing,
            } => {
                assert_eq!(requested, 2);
                assert_eq!(returned, 1);
                assert_eq!(missing, vec!["Mail".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Aborted before traversal
        assert_eq!(backend.availability_queries(&ServiceId::new("1")), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_names_requested_services() {
        let backend = backend();
        backend.fail(&ServiceId::new("1"), FailPoint::Lookup);

        let runner = ReportRunner::new(backend);
        let err = runner.lookup_roots(&["Web".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("Web"));
    }

    #[tokio::test]
    async fn test_no_services_gives_empty_forest() {
        let runner = ReportRunner::new(Arc::new(InMemoryBackend::new()));
        let forest = runner.run(&ReportOptions::default()).await.unwrap();
        assert!(forest.is_empty());
        assert_eq!(forest.max_observed_depth, 0);
    }
}
